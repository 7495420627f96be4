use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::error;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{UserRole, UserStatus},
        requests::UpdateUserRequest,
        responses::UserResponse,
    },
};
use crate::services::{current_user, storage_failure};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple};

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    mut update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;

    // 防止管理员把自己降级或停用后无人可管
    if me.id == user_id
        && (update_data.role.is_some_and(|r| r != UserRole::Admin)
            || update_data.status.is_some_and(|s| s != UserStatus::Active))
    {
        return Ok(ApiResponse::bad_request(
            ErrorCode::UserUpdateFailed,
            "You cannot change your own role or status",
        ));
    }

    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.as_deref() {
        let email = email.trim().to_lowercase();
        if let Err(msg) = validate_email(&email) {
            return Ok(ApiResponse::bad_request(ErrorCode::UserEmailInvalid, msg));
        }
        match storage.get_user_by_email(&email).await {
            Ok(Some(other)) if other.id != user_id => {
                return Ok(ApiResponse::respond(
                    StatusCode::CONFLICT,
                    ErrorCode::UserEmailAlreadyExists,
                    "Email already exists",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_failure("User lookup", &e)),
        }
        update_data.email = Some(email);
    }

    if let Some(password) = update_data.password.take() {
        if let Err(msg) = validate_password_simple(&password) {
            return Ok(ApiResponse::bad_request(ErrorCode::UserPasswordInvalid, msg));
        }
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => {
                error!("Password hashing failed: {}", e);
                return Ok(ApiResponse::internal_error("Password hashing failed"));
            }
        }
    }

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "User updated",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => {
            error!("User update failed: {}", e);
            Ok(ApiResponse::respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UserUpdateFailed,
                "User update failed",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{memory_storage, request_as, seed_user};

    fn change(role: Option<UserRole>, status: Option<UserStatus>) -> UpdateUserRequest {
        UpdateUserRequest {
            email: None,
            password: None,
            role,
            status,
            display_name: None,
        }
    }

    #[actix_web::test]
    async fn test_admin_cannot_demote_or_deactivate_self() {
        let storage = memory_storage().await;
        let admin = seed_user(storage.as_ref(), "sanne", UserRole::Admin).await;
        let request = request_as(&storage, &admin);
        let service = UserService::new_lazy();

        let resp = service
            .update_user(admin.id, change(Some(UserRole::Agent), None), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = service
            .update_user(admin.id, change(None, Some(UserStatus::Inactive)), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let unchanged = storage.get_user_by_id(admin.id).await.unwrap().unwrap();
        assert_eq!(unchanged.role, UserRole::Admin);
        assert_eq!(unchanged.status, UserStatus::Active);

        // 不改角色和状态的自我修改照常生效
        let mut rename = change(Some(UserRole::Admin), None);
        rename.display_name = Some("Sanne V.".into());
        let resp = service.update_user(admin.id, rename, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_admin_can_demote_others() {
        let storage = memory_storage().await;
        let admin = seed_user(storage.as_ref(), "sanne", UserRole::Admin).await;
        let other = seed_user(storage.as_ref(), "joost", UserRole::Admin).await;
        let request = request_as(&storage, &admin);

        let resp = UserService::new_lazy()
            .update_user(other.id, change(Some(UserRole::Agent), None), &request)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let demoted = storage.get_user_by_id(other.id).await.unwrap().unwrap();
        assert_eq!(demoted.role, UserRole::Agent);
    }
}
