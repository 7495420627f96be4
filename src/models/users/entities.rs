use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,  // 管理员
    Agent,  // 客服
    Viewer, // 只读
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const AGENT: &'static str = "agent";
    pub const VIEWER: &'static str = "viewer";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 可以修改业务记录的角色
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Agent]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Agent, &Self::Viewer]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, agent, viewer"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Agent => write!(f, "{}", UserRole::AGENT),
            UserRole::Viewer => write!(f, "{}", UserRole::VIEWER),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::AGENT => Ok(UserRole::Agent),
            UserRole::VIEWER => Ok(UserRole::Viewer),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

define_string_enum! {
    // 用户状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
        Suspended => "suspended",
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// viewer 只读
    pub fn can_write(&self) -> bool {
        UserRole::staff_roles().contains(&&self.role)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> crate::errors::Result<crate::utils::jwt::TokenPair> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            &self.role.to_string(),
            refresh_token_expiry,
        )
        .map_err(|e| crate::errors::ThriftHubError::authentication(format!("生成 token 对失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        assert_eq!("agent".parse::<UserRole>(), Ok(UserRole::Agent));
        assert_eq!(UserRole::Viewer.to_string(), "viewer");
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<UserRole>("\"root\"").unwrap_err();
        assert!(err.to_string().contains("admin, agent, viewer"));
    }

    #[test]
    fn test_staff_roles_exclude_viewer() {
        assert!(!UserRole::staff_roles().contains(&&UserRole::Viewer));
        assert_eq!(UserRole::all_roles().len(), 3);
    }

    #[test]
    fn test_write_access_by_role() {
        let now = chrono::Utc::now();
        let mut user = User {
            id: 7,
            username: "sanne".into(),
            email: "sanne@dutchthrift.nl".into(),
            password_hash: String::new(),
            role: UserRole::Viewer,
            status: UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!user.can_write());
        user.role = UserRole::Agent;
        assert!(user.can_write() && !user.is_admin());
    }
}
