pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::todos::entities::Todo;
use crate::models::todos::requests::{
    CreateTodoRequest, TodoListParams, UpdateTodoRequest, UpdateTodoStatusRequest,
};
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::storage::Storage;

/// 待办。个人待办只有所有者和管理员可见、可改
pub struct TodoService {
    storage: Option<Arc<dyn Storage>>,
}

impl TodoService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_todos(
        &self,
        request: &HttpRequest,
        query: TodoListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_todos(self, request, query).await
    }

    pub async fn get_todo(&self, request: &HttpRequest, todo_id: i64) -> ActixResult<HttpResponse> {
        get::get_todo(self, request, todo_id).await
    }

    pub async fn create_todo(
        &self,
        request: &HttpRequest,
        todo_data: CreateTodoRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_todo(self, request, todo_data).await
    }

    pub async fn update_todo(
        &self,
        request: &HttpRequest,
        todo_id: i64,
        update_data: UpdateTodoRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_todo(self, request, todo_id, update_data).await
    }

    pub async fn update_todo_status(
        &self,
        request: &HttpRequest,
        todo_id: i64,
        status_data: UpdateTodoStatusRequest,
    ) -> ActixResult<HttpResponse> {
        let update_data = UpdateTodoRequest {
            status: Some(status_data.status),
            ..Default::default()
        };
        update::update_todo(self, request, todo_id, update_data).await
    }

    pub async fn delete_todo(&self, request: &HttpRequest, todo_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_todo(self, request, todo_id).await
    }
}

/// 读取当前用户可修改的待办。看不到的待办按不存在处理
pub(crate) async fn load_editable_todo(
    storage: &dyn Storage,
    user: &User,
    todo_id: i64,
) -> Result<Todo, HttpResponse> {
    let todo = match storage.get_todo_by_id(todo_id).await {
        Ok(Some(todo)) if todo.visible_to(user.id, user.is_admin()) => todo,
        Ok(_) => return Err(ApiResponse::not_found(ErrorCode::TodoNotFound, "Todo not found")),
        Err(e) => return Err(storage_failure("Get todo", &e)),
    };

    if !todo.editable_by(user.id, user.is_admin()) {
        return Err(ApiResponse::forbidden(
            ErrorCode::TodoPermissionDenied,
            "You do not have permission to modify this todo",
        ));
    }
    Ok(todo)
}

/// 关联的工单需要存在
pub(crate) async fn check_case_reference(
    storage: &dyn Storage,
    case_id: Option<i64>,
) -> Result<(), HttpResponse> {
    let Some(case_id) = case_id else {
        return Ok(());
    };
    match storage.get_case_by_id(case_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ApiResponse::bad_request(
            ErrorCode::CaseNotFound,
            "Case not found",
        )),
        Err(e) => Err(storage_failure("Case lookup", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::todos::entities::{TodoScope, TodoStatus};
    use crate::models::users::entities::UserRole;
    use crate::services::testing::{memory_storage, request_as, seed_user};
    use actix_web::http::StatusCode;

    fn new_todo(title: &str, scope: TodoScope) -> CreateTodoRequest {
        CreateTodoRequest {
            title: title.to_string(),
            description: None,
            priority: None,
            scope: Some(scope),
            assignee_id: None,
            due_at: None,
            order_id: None,
            case_id: None,
        }
    }

    fn to_done() -> UpdateTodoStatusRequest {
        UpdateTodoStatusRequest {
            status: TodoStatus::Done,
        }
    }

    #[actix_web::test]
    async fn test_personal_todo_hidden_from_other_agents() {
        let storage = memory_storage().await;
        let owner = seed_user(storage.as_ref(), "mark", UserRole::Agent).await;
        let other = seed_user(storage.as_ref(), "pim", UserRole::Agent).await;
        let admin = seed_user(storage.as_ref(), "sanne", UserRole::Admin).await;
        let todo = storage
            .create_todo(owner.id, new_todo("Retourlabel sturen", TodoScope::Personal))
            .await
            .unwrap();
        let service = TodoService::new_lazy();
        let as_other = request_as(&storage, &other);

        let resp = service.get_todo(&as_other, todo.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = service
            .update_todo_status(&as_other, todo.id, to_done())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = service.delete_todo(&as_other, todo.id).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let unchanged = storage.get_todo_by_id(todo.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, TodoStatus::Todo);

        let resp = service
            .update_todo_status(&request_as(&storage, &owner), todo.id, to_done())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .delete_todo(&request_as(&storage, &admin), todo.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_todo_by_id(todo.id).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_team_todo_editable_by_any_agent() {
        let storage = memory_storage().await;
        let owner = seed_user(storage.as_ref(), "mark", UserRole::Agent).await;
        let other = seed_user(storage.as_ref(), "pim", UserRole::Agent).await;
        let todo = storage
            .create_todo(owner.id, new_todo("Voorraad tellen", TodoScope::Team))
            .await
            .unwrap();

        let resp = TodoService::new_lazy()
            .update_todo_status(&request_as(&storage, &other), todo.id, to_done())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let done = storage.get_todo_by_id(todo.id).await.unwrap().unwrap();
        assert_eq!(done.status, TodoStatus::Done);
    }
}
