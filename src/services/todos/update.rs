use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{TodoService, check_case_reference, load_editable_todo};
use crate::models::{ApiResponse, ErrorCode, todos::requests::UpdateTodoRequest};
use crate::services::{check_references, current_user, storage_failure};

pub async fn update_todo(
    service: &TodoService,
    request: &HttpRequest,
    todo_id: i64,
    update_data: UpdateTodoRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    if update_data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Todo title cannot be empty",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = load_editable_todo(storage.as_ref(), &user, todo_id).await {
        return Ok(resp);
    }
    if let Err(resp) = check_references(
        storage.as_ref(),
        update_data.order_id,
        None,
        update_data.assignee_id,
    )
    .await
    {
        return Ok(resp);
    }
    if let Err(resp) = check_case_reference(storage.as_ref(), update_data.case_id).await {
        return Ok(resp);
    }

    match storage.update_todo(todo_id, update_data).await {
        Ok(Some(todo)) => Ok(HttpResponse::Ok().json(ApiResponse::success(todo, "Todo updated"))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::TodoNotFound, "Todo not found")),
        Err(e) => Ok(storage_failure("Update todo", &e)),
    }
}
