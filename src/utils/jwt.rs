use crate::config::{AppConfig, JwtConfig};
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_COOKIE: &str = "refresh_token";

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,     // 用户 ID
    pub role: String,    // 用户角色
    pub kind: TokenKind, // token 类型
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn jwt_config() -> &'static JwtConfig {
        &AppConfig::get().jwt
    }

    /// access token 有效期（秒）
    pub fn access_token_ttl_secs() -> i64 {
        Self::jwt_config().access_token_expiry * 60
    }

    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = Self::jwt_config();
        Self::sign(
            &config.secret,
            user_id,
            role,
            TokenKind::Access,
            chrono::Duration::minutes(config.access_token_expiry),
        )
    }

    /// 未指定有效期时使用 `jwt.refresh_token_expiry` 天
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = Self::jwt_config();
        let expiry =
            token_expiry.unwrap_or_else(|| chrono::Duration::days(config.refresh_token_expiry));
        Self::sign(&config.secret, user_id, role, TokenKind::Refresh, expiry)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_token_expiry)?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::jwt_config().secret, token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify(&Self::jwt_config().secret, token, TokenKind::Refresh)
    }

    fn sign(
        secret: &str,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        expiry: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            kind,
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    fn verify(
        secret: &str,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;
        if claims.kind != expected {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, days: i64) -> Cookie<'static> {
        Self::refresh_cookie(
            refresh_token.to_string(),
            actix_web::cookie::time::Duration::days(days),
        )
    }

    /// 注销时下发的空 Cookie
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), actix_web::cookie::time::Duration::seconds(0))
    }

    fn refresh_cookie(value: String, max_age: actix_web::cookie::time::Duration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_sign_and_verify() {
        let token = JwtUtils::sign(
            SECRET,
            42,
            "agent",
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        let claims = JwtUtils::verify(SECRET, &token, TokenKind::Access).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.role, "agent");
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        let token = JwtUtils::sign(
            SECRET,
            1,
            "admin",
            TokenKind::Refresh,
            chrono::Duration::days(1),
        )
        .unwrap();
        assert!(JwtUtils::verify(SECRET, &token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::sign(
            SECRET,
            1,
            "admin",
            TokenKind::Access,
            chrono::Duration::minutes(5),
        )
        .unwrap();
        assert!(JwtUtils::verify("other", &token, TokenKind::Access).is_err());
    }
}
