use crate::models::common::Priority;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
    pub enum TodoStatus {
        Todo => "todo",
        InProgress => "in_progress",
        Done => "done",
    }
}

define_string_enum! {
    // 个人待办只有所有者（和管理员）可见可改；团队待办所有人可见
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
    pub enum TodoScope {
        Personal => "personal",
        Team => "team",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/todo.ts")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: Priority,
    pub scope: TodoScope,
    pub owner_id: i64,
    pub assignee_id: Option<i64>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Todo {
    /// 当前用户是否可以查看
    pub fn visible_to(&self, user_id: i64, is_admin: bool) -> bool {
        is_admin || self.scope == TodoScope::Team || self.owner_id == user_id
    }

    /// 个人待办只有所有者和管理员可以修改，与可见性规则一致
    pub fn editable_by(&self, user_id: i64, is_admin: bool) -> bool {
        self.visible_to(user_id, is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(scope: TodoScope, owner_id: i64) -> Todo {
        let now = chrono::Utc::now();
        Todo {
            id: 1,
            title: "Bel klant terug".into(),
            description: None,
            status: TodoStatus::Todo,
            priority: Priority::Normal,
            scope,
            owner_id,
            assignee_id: None,
            due_at: None,
            order_id: None,
            case_id: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_personal_todo_only_for_owner_and_admin() {
        let t = todo(TodoScope::Personal, 7);
        assert!(t.visible_to(7, false));
        assert!(!t.visible_to(8, false));
        assert!(t.visible_to(8, true));
        assert!(!t.editable_by(8, false));
    }

    #[test]
    fn test_team_todo_for_everyone() {
        let t = todo(TodoScope::Team, 7);
        assert!(t.visible_to(99, false));
        assert!(t.editable_by(99, false));
    }
}
