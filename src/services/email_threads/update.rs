use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EmailThreadService;
use crate::models::{ApiResponse, ErrorCode, email_threads::requests::UpdateThreadRequest};
use crate::services::{check_references, storage_failure};

pub async fn update_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
    update_data: UpdateThreadRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    // 0 表示取消分配
    let assignee = update_data.assigned_to.filter(|id| *id > 0);
    if let Err(resp) = check_references(storage.as_ref(), None, None, assignee).await {
        return Ok(resp);
    }

    match storage.update_thread(thread_id, update_data).await {
        Ok(Some(thread)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            thread,
            "Email thread updated",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(
            ErrorCode::EmailThreadNotFound,
            "Email thread not found",
        )),
        Err(e) => Ok(storage_failure("Update email thread", &e)),
    }
}
