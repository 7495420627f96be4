//! 路径参数提取器
//!
//! 在进入处理函数之前完成校验，非法参数直接返回 400 的 JSON 响应。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn reject(message: String) -> actix_web::Error {
    InternalError::from_response(
        message.clone(),
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

/// `{id}` 路径参数，必须是正整数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        ready(match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(reject(format!("Invalid id: '{raw}'"))),
        })
    }
}

/// `{file_token}` 路径参数，UUID 形式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeFileToken(pub String);

impl FromRequest for SafeFileToken {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("file_token").unwrap_or_default();
        ready(match uuid::Uuid::parse_str(raw) {
            Ok(token) => Ok(SafeFileToken(token.to_string())),
            Err(_) => Err(reject(format!("Invalid file token: '{raw}'"))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_id_extractor() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, SafeIDI64(42));

        for bad in ["0", "-3", "abc", ""] {
            let req = TestRequest::default().param("id", bad).to_http_request();
            assert!(SafeIDI64::extract(&req).await.is_err(), "{bad}");
        }
    }

    #[actix_web::test]
    async fn test_file_token_extractor() {
        let token = uuid::Uuid::new_v4().to_string();
        let req = TestRequest::default()
            .param("file_token", token.clone())
            .to_http_request();
        assert_eq!(SafeFileToken::extract(&req).await.unwrap().0, token);

        let req = TestRequest::default()
            .param("file_token", "../../etc/passwd")
            .to_http_request();
        assert!(SafeFileToken::extract(&req).await.is_err());
    }
}
