use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TodoService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn get_todo(
    service: &TodoService,
    request: &HttpRequest,
    todo_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    match storage.get_todo_by_id(todo_id).await {
        Ok(Some(todo)) if todo.visible_to(user.id, user.is_admin()) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(todo, "Todo retrieved successfully"))),
        Ok(_) => Ok(ApiResponse::not_found(ErrorCode::TodoNotFound, "Todo not found")),
        Err(e) => Ok(storage_failure("Get todo", &e)),
    }
}
