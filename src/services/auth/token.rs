use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::models::auth::responses::{RefreshTokenResponse, TokenVerificationResponse};
use crate::models::users::entities::UserStatus;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn session_expired() -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(session_expired());
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(session_expired());
    };

    // 角色或状态可能在 refresh token 有效期内被修改，以数据库为准
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(session_expired()),
        Err(e) => {
            error!("Failed to load user {} during refresh: {}", user_id, e);
            return Ok(ApiResponse::internal_error("Token refresh failed"));
        }
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: JwtUtils::access_token_ttl_secs(),
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            error!("Failed to sign access token: {}", e);
            Ok(ApiResponse::internal_error("Token refresh failed"))
        }
    }
}

pub async fn handle_verify_token(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 能走到这里说明 RequireJWT 已经放行
    let user = crate::services::current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse::for_user(&user),
        "Token is valid",
    )))
}

pub async fn handle_get_user(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = crate::services::current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user },
        "User information retrieved successfully",
    )))
}
