use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TodoService, check_case_reference};
use crate::models::{ApiResponse, ErrorCode, todos::requests::CreateTodoRequest};
use crate::services::{check_references, current_user, storage_failure};

pub async fn create_todo(
    service: &TodoService,
    request: &HttpRequest,
    mut todo_data: CreateTodoRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    todo_data.title = todo_data.title.trim().to_string();
    if todo_data.title.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Todo title is required",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) =
        check_references(storage.as_ref(), todo_data.order_id, None, todo_data.assignee_id).await
    {
        return Ok(resp);
    }
    if let Err(resp) = check_case_reference(storage.as_ref(), todo_data.case_id).await {
        return Ok(resp);
    }

    match storage.create_todo(user.id, todo_data).await {
        Ok(todo) => Ok(HttpResponse::Created().json(ApiResponse::success(todo, "Todo created"))),
        Err(e) => Ok(storage_failure("Create todo", &e)),
    }
}
