use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::todos::requests::{
    CreateTodoRequest, TodoListParams, UpdateTodoRequest, UpdateTodoStatusRequest,
};
use crate::services::TodoService;
use crate::utils::SafeIDI64;

static TODO_SERVICE: Lazy<TodoService> = Lazy::new(TodoService::new_lazy);

pub async fn list_todos(
    req: HttpRequest,
    query: web::Query<TodoListParams>,
) -> ActixResult<HttpResponse> {
    TODO_SERVICE.list_todos(&req, query.into_inner()).await
}

pub async fn get_todo(req: HttpRequest, todo_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TODO_SERVICE.get_todo(&req, todo_id.0).await
}

pub async fn create_todo(
    req: HttpRequest,
    todo_data: web::Json<CreateTodoRequest>,
) -> ActixResult<HttpResponse> {
    TODO_SERVICE
        .create_todo(&req, todo_data.into_inner())
        .await
}

pub async fn update_todo(
    req: HttpRequest,
    todo_id: SafeIDI64,
    update_data: web::Json<UpdateTodoRequest>,
) -> ActixResult<HttpResponse> {
    TODO_SERVICE
        .update_todo(&req, todo_id.0, update_data.into_inner())
        .await
}

pub async fn update_todo_status(
    req: HttpRequest,
    todo_id: SafeIDI64,
    status_data: web::Json<UpdateTodoStatusRequest>,
) -> ActixResult<HttpResponse> {
    TODO_SERVICE
        .update_todo_status(&req, todo_id.0, status_data.into_inner())
        .await
}

pub async fn delete_todo(req: HttpRequest, todo_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TODO_SERVICE.delete_todo(&req, todo_id.0).await
}

// 配置路由
pub fn configure_todos_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/todos")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_todos))
                    .route(web::post().to(create_todo)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_todo))
                    .route(web::put().to(update_todo))
                    .route(web::delete().to(delete_todo)),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(update_todo_status)),
            ),
    );
}
