use super::entities::Todo;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct TodoListResponse {
    pub items: Vec<Todo>,
    pub pagination: PaginationInfo,
}
