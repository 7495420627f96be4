use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 邮件会话状态
    #[derive(TS, Default)]
    #[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
    pub enum ThreadStatus {
        #[default]
        Open => "open",
        Pending => "pending",
        Closed => "closed",
        Spam => "spam",
    }
}

impl ThreadStatus {
    /// 新邮件可以并入的会话状态
    pub fn accepts_subject_match(&self) -> bool {
        matches!(self, ThreadStatus::Open | ThreadStatus::Pending)
    }
}

define_string_enum! {
    #[derive(TS, Default)]
    #[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
    pub enum MessageDirection {
        #[default]
        Inbound => "inbound",
        Outbound => "outbound",
    }
}

// 邮件会话
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct EmailThread {
    pub id: i64,
    pub subject: String,
    /// 去掉 Re:/Fwd: 等前缀后的小写主题，用于归并会话
    pub normalized_subject: String,
    /// 对方（客户）邮箱
    pub participant_email: String,
    pub participant_name: Option<String>,
    pub status: ThreadStatus,
    pub is_read: bool,
    pub assigned_to: Option<i64>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub return_id: Option<i64>,
    pub message_count: i32,
    pub last_message_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl EmailThread {
    pub fn links(&self) -> crate::linking::ThreadLinks {
        crate::linking::ThreadLinks {
            customer_id: self.customer_id,
            order_id: self.order_id,
            return_id: self.return_id,
            repair_id: self.repair_id,
            case_id: self.case_id,
        }
    }
}

// 单封邮件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct EmailMessage {
    pub id: i64,
    pub thread_id: i64,
    /// RFC 5322 Message-ID，全局唯一
    pub message_id: String,
    pub in_reply_to: Option<String>,
    pub references: Vec<String>,
    pub direction: MessageDirection,
    pub from_email: String,
    pub from_name: Option<String>,
    pub to_emails: Vec<String>,
    pub subject: String,
    pub body_text: Option<String>,
    pub body_html: Option<String>,
    pub sent_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
