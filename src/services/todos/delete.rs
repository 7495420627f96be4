use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TodoService, load_editable_todo};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn delete_todo(
    service: &TodoService,
    request: &HttpRequest,
    todo_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    if let Err(resp) = load_editable_todo(storage.as_ref(), &user, todo_id).await {
        return Ok(resp);
    }

    match storage.delete_todo(todo_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Todo deleted"))),
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::TodoNotFound, "Todo not found")),
        Err(e) => Ok(storage_failure("Delete todo", &e)),
    }
}
