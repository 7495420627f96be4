use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::{error, info};

use super::UserService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let me = current_user(request)?;
    if me.id == user_id {
        return Ok(ApiResponse::bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "You cannot delete your own account",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.delete_user(user_id).await {
        Ok(true) => {
            info!("User {} deleted by {}", user_id, me.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted")))
        }
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => {
            error!("User deletion failed: {}", e);
            Ok(ApiResponse::respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::UserDeleteFailed,
                "User deletion failed",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::services::testing::{memory_storage, request_as, seed_user};

    #[actix_web::test]
    async fn test_admin_cannot_delete_self() {
        let storage = memory_storage().await;
        let admin = seed_user(storage.as_ref(), "sanne", UserRole::Admin).await;
        let agent = seed_user(storage.as_ref(), "mark", UserRole::Agent).await;
        let request = request_as(&storage, &admin);
        let service = UserService::new_lazy();

        let resp = service.delete_user(admin.id, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(storage.get_user_by_id(admin.id).await.unwrap().is_some());

        let resp = service.delete_user(agent.id, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_user_by_id(agent.id).await.unwrap().is_none());

        let resp = service.delete_user(agent.id, &request).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
