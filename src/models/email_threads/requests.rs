use super::entities::{MessageDirection, ThreadStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ThreadListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ThreadStatus>,
    pub is_read: Option<bool>,
    pub assigned_to: Option<i64>,
    /// 匹配主题或对方邮箱
    pub search: Option<String>,
}

// 收录一封邮件（由邮件网关或导入脚本调用）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct IngestEmailRequest {
    pub message_id: String,
    pub in_reply_to: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub direction: MessageDirection,
    pub from_email: String,
    pub from_name: Option<String>,
    #[serde(default)]
    pub to_emails: Vec<String>,
    #[serde(default)]
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    /// 缺省为收录时间
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// `assigned_to` 传 0 表示取消分配
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct UpdateThreadRequest {
    pub status: Option<ThreadStatus>,
    pub is_read: Option<bool>,
    pub assigned_to: Option<i64>,
}

/// 手动关联：缺省保持不变，0 表示清除
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct LinkThreadRequest {
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub return_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub case_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ReplyThreadRequest {
    pub body_text: String,
    pub body_html: Option<String>,
}

/// 新建会话所需字段（收录邮件时由服务层构造）
#[derive(Debug, Clone)]
pub struct NewEmailThread {
    pub subject: String,
    pub normalized_subject: String,
    pub participant_email: String,
    pub participant_name: Option<String>,
    pub status: ThreadStatus,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
}
