use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use crate::middlewares::RequireJWT;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::users::responses::UserResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::{validate_email, validate_password_simple};

use super::AuthService;

/// 修改自己的显示名、邮箱或密码。改密码必须提供当前密码
pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let me = current_user(request)?;

    let email = match update_data.email.as_deref().map(|e| e.trim().to_lowercase()) {
        Some(email) => {
            if let Err(msg) = validate_email(&email) {
                return Ok(ApiResponse::bad_request(ErrorCode::UserEmailInvalid, msg));
            }
            match storage.get_user_by_email(&email).await {
                Ok(Some(other)) if other.id != me.id => {
                    return Ok(ApiResponse::respond(
                        actix_web::http::StatusCode::CONFLICT,
                        ErrorCode::UserEmailAlreadyExists,
                        "Email is already in use",
                    ));
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Email uniqueness check failed: {}", e);
                    return Ok(ApiResponse::internal_error("Failed to update profile"));
                }
            }
            Some(email)
        }
        None => None,
    };

    let password = match update_data.new_password.as_deref() {
        Some(new_password) => {
            // JWT 缓存里的用户不带密码哈希，这里从库里取
            let stored = match storage.get_user_by_id(me.id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    return Ok(ApiResponse::not_found(ErrorCode::UserNotFound, "User not found"));
                }
                Err(e) => {
                    error!("Failed to load user {}: {}", me.id, e);
                    return Ok(ApiResponse::internal_error("Failed to update profile"));
                }
            };
            let current_ok = update_data
                .current_password
                .as_deref()
                .is_some_and(|current| verify_password(current, &stored.password_hash));
            if !current_ok {
                return Ok(ApiResponse::bad_request(
                    ErrorCode::UserPasswordInvalid,
                    "Current password is incorrect",
                ));
            }
            if let Err(msg) = validate_password_simple(new_password) {
                return Ok(ApiResponse::bad_request(ErrorCode::UserPasswordInvalid, msg));
            }
            match hash_password(new_password) {
                Ok(hash) => Some(hash),
                Err(e) => {
                    error!("Password hashing failed: {}", e);
                    return Ok(ApiResponse::internal_error("Failed to update profile"));
                }
            }
        }
        None => None,
    };

    // 自己不能改角色和状态
    let update = UpdateUserRequest {
        email,
        password,
        role: None,
        status: None,
        display_name: update_data.display_name,
    };

    match storage.update_user(me.id, update).await {
        Ok(Some(user)) => {
            RequireJWT::invalidate_cached_user(request).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Profile updated",
            )))
        }
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => {
            error!("Failed to update profile of user {}: {}", me.id, e);
            Ok(ApiResponse::respond(
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UserUpdateFailed,
                "Failed to update profile",
            ))
        }
    }
}
