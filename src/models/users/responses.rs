use super::entities::{User, UserRole};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
}

/// 分配给某个同事、尚未完结的工作量
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserWorkload {
    pub open_todos: i64,
    pub open_threads: i64,
    pub active_repairs: i64,
    pub open_cases: i64,
}

impl UserWorkload {
    pub fn total(&self) -> i64 {
        self.open_todos + self.open_threads + self.active_repairs + self.open_cases
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserDetailResponse {
    pub user: User,
    pub workload: UserWorkload,
}

/// 指派下拉框用的精简信息，所有角色可见
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AssignableUser {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}

impl From<&User> for AssignableUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_total() {
        let workload = UserWorkload {
            open_todos: 2,
            open_threads: 5,
            active_repairs: 1,
            open_cases: 0,
        };
        assert_eq!(workload.total(), 8);
        assert_eq!(UserWorkload::default().total(), 0);
    }
}
