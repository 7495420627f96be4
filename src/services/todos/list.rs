use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TodoService;
use crate::models::{ApiResponse, todos::requests::TodoListParams};
use crate::services::{current_user, storage_failure};

pub async fn list_todos(
    service: &TodoService,
    request: &HttpRequest,
    query: TodoListParams,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    // 管理员不过滤
    let viewer = (!user.is_admin()).then_some(user.id);

    match storage.list_todos_with_pagination(query, viewer).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Todo list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List todos", &e)),
    }
}
