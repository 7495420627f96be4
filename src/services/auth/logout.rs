use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 清除 refresh token cookie，并丢弃当前 access token 的用户缓存
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    RequireJWT::invalidate_cached_user(request).await;

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}
