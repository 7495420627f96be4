/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个键在窗口内最多放行 `max_requests` 次，超出返回 429。
 * 键为 `前缀:user:<id>`（已认证）或 `前缀:ip:<addr>`。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::net::IpAddr;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use super::create_error_response;
use crate::models::ErrorCode;
use crate::models::users::entities::User;

// 条目从首次计数开始计时，过期即进入新窗口
static RATE_LIMIT_CACHE: Lazy<Cache<String, u32>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(60))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix,
        }
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 刷新令牌：10 次/分钟
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    /// 附件上传：20 次/分钟
    pub fn file_upload() -> Self {
        Self::new("upload", 20, 60)
    }

    /// 手动触发同步：3 次/分钟
    pub fn sync_trigger() -> Self {
        Self::new("sync", 3, 60)
    }
}

// 优先取连接信息中的地址（会参考 Forwarded / X-Forwarded-For），无法解析时退回 peer 地址
fn client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    info.realip_remote_addr()
        .and_then(|addr| {
            addr.parse::<IpAddr>()
                .ok()
                .or_else(|| addr.parse::<std::net::SocketAddr>().ok().map(|s| s.ip()))
        })
        .map(|ip| ip.to_string())
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn limit_key(prefix: &str, req: &ServiceRequest) -> String {
    // 先释放 extensions 的借用，connection_info() 需要可变借用
    let user_id = req.extensions().get::<User>().map(|u| u.id);
    match user_id {
        Some(id) => format!("{prefix}:user:{id}"),
        None => format!("{prefix}:ip:{}", client_ip(req)),
    }
}

fn too_many_requests(retry_after: u64) -> HttpResponse {
    let mut resp = create_error_response(
        StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::RateLimitExceeded,
        "Too many requests, please try again later",
    );
    resp.headers_mut().insert(
        actix_web::http::header::RETRY_AFTER,
        actix_web::http::header::HeaderValue::from(retry_after),
    );
    resp
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let key = limit_key(limit.key_prefix, &req);

            // 原子地读取并加一
            let count = RATE_LIMIT_CACHE
                .entry(key.clone())
                .and_upsert_with(|entry| {
                    let next = entry.map(|e| e.into_value()).unwrap_or(0).saturating_add(1);
                    std::future::ready(next)
                })
                .await
                .into_value();

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                return Ok(req.into_response(
                    too_many_requests(limit.window_secs).map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, web};

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(RateLimit::refresh_token().key_prefix, "refresh");
    }

    #[test]
    fn test_limit_key_anonymous_uses_ip() {
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .peer_addr("10.9.8.7:4321".parse().unwrap())
            .to_srv_request();
        assert_eq!(limit_key("login", &req), "login:ip:10.9.8.7");
    }

    #[test]
    fn test_limit_key_authenticated_uses_user() {
        let now = chrono::Utc::now();
        let req = actix_web::test::TestRequest::post()
            .uri("/api/v1/files/upload")
            .peer_addr("10.9.8.7:4321".parse().unwrap())
            .to_srv_request();
        req.extensions_mut().insert(User {
            id: 42,
            username: "sanne".into(),
            email: "sanne@dutchthrift.nl".into(),
            password_hash: String::new(),
            role: crate::models::users::entities::UserRole::Agent,
            status: crate::models::users::entities::UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(limit_key("upload", &req), "upload:user:42");
    }

    #[actix_web::test]
    async fn test_anonymous_login_is_limited_without_panic() {
        let app = actix_web::test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::new("unit-test-login", 1, 60))
                    .route(web::post().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let first = actix_web::test::TestRequest::post()
            .uri("/login")
            .peer_addr("192.168.5.5:1000".parse().unwrap())
            .to_request();
        let second = actix_web::test::TestRequest::post()
            .uri("/login")
            .peer_addr("192.168.5.5:1001".parse().unwrap())
            .to_request();
        assert_eq!(
            actix_web::test::call_service(&app, first).await.status(),
            StatusCode::OK
        );
        assert_eq!(
            actix_web::test::call_service(&app, second).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_rejects_after_limit() {
        let app = actix_web::test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new("unit-test-limit", 2, 60))
                    .route(web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let mut statuses = Vec::new();
        for _ in 0..3 {
            let req = actix_web::test::TestRequest::get()
                .uri("/limited")
                .peer_addr("10.1.2.3:5000".parse().unwrap())
                .to_request();
            statuses.push(actix_web::test::call_service(&app, req).await.status());
        }
        assert_eq!(
            statuses,
            vec![StatusCode::OK, StatusCode::OK, StatusCode::TOO_MANY_REQUESTS]
        );
    }
}
