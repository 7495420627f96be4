use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EmailThreadService;
use crate::models::{ApiResponse, email_threads::requests::ThreadListParams};
use crate::services::storage_failure;

pub async fn list_threads(
    service: &EmailThreadService,
    request: &HttpRequest,
    query: ThreadListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_threads_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Email threads retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List email threads", &e)),
    }
}
