use crate::models::users::entities::{User, UserRole};
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginResponse {
    pub access_token: String,
    /// access token 有效期（秒）
    pub expires_in: i64,
    pub user: User,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct TokenVerificationResponse {
    pub is_valid: bool,
    pub user_id: i64,
    pub role: UserRole,
    /// 前端据此决定是否显示编辑入口
    pub can_write: bool,
    pub is_admin: bool,
}

impl TokenVerificationResponse {
    pub fn for_user(user: &User) -> Self {
        Self {
            is_valid: true,
            user_id: user.id,
            role: user.role,
            can_write: user.can_write(),
            is_admin: user.is_admin(),
        }
    }
}
