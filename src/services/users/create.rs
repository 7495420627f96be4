use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::storage_failure;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    user_data.normalize();

    if let Err(msg) = validate_username(&user_data.username) {
        return Ok(ApiResponse::bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user_data.email) {
        return Ok(ApiResponse::bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&user_data.password) {
        return Ok(ApiResponse::bad_request(ErrorCode::UserPasswordInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    match storage.get_user_by_username(&user_data.username).await {
        Ok(Some(_)) => {
            return Ok(ApiResponse::respond(
                StatusCode::CONFLICT,
                ErrorCode::UserNameAlreadyExists,
                "Username already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_failure("User lookup", &e)),
    }
    match storage.get_user_by_email(&user_data.email).await {
        Ok(Some(_)) => {
            return Ok(ApiResponse::respond(
                StatusCode::CONFLICT,
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_failure("User lookup", &e)),
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(ApiResponse::internal_error("Password hashing failed"));
        }
    };

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("Created user {} ({})", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created")))
        }
        Err(e) => {
            error!("User creation failed: {}", e);
            Ok(ApiResponse::respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UserCreationFailed,
                "User creation failed",
            ))
        }
    }
}
