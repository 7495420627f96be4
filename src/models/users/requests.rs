use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 管理员查看用户列表的筛选条件
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

fn default_role() -> UserRole {
    UserRole::Agent
}

/// 新建同事账号，默认角色为客服
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
    pub display_name: Option<String>,
}

impl CreateUserRequest {
    /// 用户名、邮箱统一小写，空显示名视为未填
    pub fn normalize(&mut self) {
        self.username = self.username.trim().to_lowercase();
        self.email = self.email.trim().to_lowercase();
        self.display_name = self
            .display_name
            .take()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
    }
}

// 管理员修改账号，未提供的字段保持不变
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub display_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_and_normalize() {
        let mut req: CreateUserRequest = serde_json::from_str(
            r#"{"username":" Sanne.V ","email":"Sanne@DutchThrift.nl","password":"x","display_name":"  "}"#,
        )
        .unwrap();
        assert_eq!(req.role, UserRole::Agent);

        req.normalize();
        assert_eq!(req.username, "sanne.v");
        assert_eq!(req.email, "sanne@dutchthrift.nl");
        assert!(req.display_name.is_none());
    }
}
