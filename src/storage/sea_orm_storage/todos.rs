use super::{SeaOrmStorage, now_ts};
use crate::entity::todos::{ActiveModel, Column, Entity as Todos};
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    todos::{
        entities::{Todo, TodoScope, TodoStatus},
        requests::{CreateTodoRequest, TodoListParams, UpdateTodoRequest},
        responses::TodoListResponse,
    },
};
use crate::utils::sql::any_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_todo_impl(&self, owner_id: i64, req: CreateTodoRequest) -> Result<Todo> {
        let now = now_ts();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            status: Set(TodoStatus::Todo.to_string()),
            priority: Set(req.priority.unwrap_or_default().to_string()),
            scope: Set(req.scope.unwrap_or(TodoScope::Personal).to_string()),
            owner_id: Set(owner_id),
            assignee_id: Set(req.assignee_id),
            due_at: Set(req.due_at.map(|d| d.timestamp())),
            order_id: Set(req.order_id),
            case_id: Set(req.case_id),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建待办失败: {e}")))?;

        Ok(result.into_todo())
    }

    pub async fn get_todo_by_id_impl(&self, id: i64) -> Result<Option<Todo>> {
        let result = Todos::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询待办失败: {e}")))?;

        Ok(result.map(|m| m.into_todo()))
    }

    /// 分页列出待办，viewer 只能看到团队待办和自己的个人待办
    pub async fn list_todos_with_pagination_impl(
        &self,
        query: TodoListParams,
        viewer: Option<i64>,
    ) -> Result<TodoListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Todos::find().filter(Column::DeletedAt.is_null());

        if let Some(user_id) = viewer {
            select = select.filter(
                Condition::any()
                    .add(Column::Scope.eq(TodoScope::Team.as_str()))
                    .add(Column::OwnerId.eq(user_id)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(scope) = query.scope {
            select = select.filter(Column::Scope.eq(scope.to_string()));
        }
        if let Some(assignee_id) = query.assignee_id {
            select = select.filter(Column::AssigneeId.eq(assignee_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[Column::Title, Column::Description],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_asc(Column::Status)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询待办总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询待办页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询待办列表失败: {e}")))?;

        Ok(TodoListResponse {
            items: items.into_iter().map(|m| m.into_todo()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新待办，进入 done 记录完成时间，离开 done 清空
    pub async fn update_todo_impl(
        &self,
        id: i64,
        update: UpdateTodoRequest,
    ) -> Result<Option<Todo>> {
        let Some(existing) = self.get_todo_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(priority) = update.priority {
            model.priority = Set(priority.to_string());
        }
        if let Some(scope) = update.scope {
            model.scope = Set(scope.to_string());
        }
        if let Some(assignee_id) = update.assignee_id {
            model.assignee_id = Set(Some(assignee_id));
        }
        if let Some(due_at) = update.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }
        if let Some(order_id) = update.order_id {
            model.order_id = Set(Some(order_id));
        }
        if let Some(case_id) = update.case_id {
            model.case_id = Set(Some(case_id));
        }

        if let Some(status) = update.status
            && status != existing.status
        {
            model.status = Set(status.to_string());
            model.completed_at = Set((status == TodoStatus::Done).then_some(now));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新待办失败: {e}")))?;

        self.get_todo_by_id_impl(id).await
    }

    pub async fn delete_todo_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = Todos::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除待办失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    fn todo_request(title: &str, scope: TodoScope) -> CreateTodoRequest {
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

    fn list_params() -> TodoListParams {
        TodoListParams {
            pagination: Default::default(),
            status: None,
            scope: None,
            assignee_id: None,
            search: None,
        }
    }

    #[tokio::test]
    async fn test_personal_todos_hidden_from_others() {
        let storage = SeaOrmStorage::in_memory().await;
        let anna = seed_user(&storage, "anna1", UserRole::Agent).await;
        let bram = seed_user(&storage, "bram1", UserRole::Agent).await;

        storage
            .create_todo_impl(anna.id, todo_request("Eigen taak", TodoScope::Personal))
            .await
            .unwrap();
        storage
            .create_todo_impl(anna.id, todo_request("Voorraad tellen", TodoScope::Team))
            .await
            .unwrap();

        let for_bram = storage
            .list_todos_with_pagination_impl(list_params(), Some(bram.id))
            .await
            .unwrap();
        assert_eq!(for_bram.pagination.total, 1);
        assert_eq!(for_bram.items[0].title, "Voorraad tellen");

        let for_anna = storage
            .list_todos_with_pagination_impl(list_params(), Some(anna.id))
            .await
            .unwrap();
        assert_eq!(for_anna.pagination.total, 2);

        let for_admin = storage
            .list_todos_with_pagination_impl(list_params(), None)
            .await
            .unwrap();
        assert_eq!(for_admin.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_done_stamps_and_clears_completed_at() {
        let storage = SeaOrmStorage::in_memory().await;
        let owner = seed_user(&storage, "owner1", UserRole::Agent).await;
        let todo = storage
            .create_todo_impl(owner.id, todo_request("Pakket ophalen", TodoScope::Team))
            .await
            .unwrap();

        let done = storage
            .update_todo_impl(
                todo.id,
                UpdateTodoRequest {
                    status: Some(TodoStatus::Done),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(done.completed_at.is_some());

        let reopened = storage
            .update_todo_impl(
                todo.id,
                UpdateTodoRequest {
                    status: Some(TodoStatus::InProgress),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.completed_at.is_none());
    }
}
