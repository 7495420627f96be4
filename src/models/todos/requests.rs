use super::entities::{TodoScope, TodoStatus};
use crate::models::common::{PaginationQuery, Priority};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct TodoListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<TodoStatus>,
    pub scope: Option<TodoScope>,
    pub assignee_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct CreateTodoRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub scope: Option<TodoScope>,
    pub assignee_id: Option<i64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub scope: Option<TodoScope>,
    pub assignee_id: Option<i64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct UpdateTodoStatusRequest {
    pub status: TodoStatus,
}
