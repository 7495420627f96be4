use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::EmailThreadService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_thread(thread_id).await {
        Ok(true) => {
            info!("Email thread {} deleted", thread_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Email thread deleted")))
        }
        Ok(false) => Ok(ApiResponse::not_found(
            ErrorCode::EmailThreadNotFound,
            "Email thread not found",
        )),
        Err(e) => Ok(storage_failure("Delete email thread", &e)),
    }
}
