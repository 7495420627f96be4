use super::entities::{EmailMessage, EmailThread};
use crate::linking::LinkPlan;
use crate::mail::quote::SplitMessage;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ThreadListResponse {
    pub items: Vec<EmailThread>,
    pub pagination: PaginationInfo,
}

// 带拆分结果的邮件
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct EmailMessageView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub message: EmailMessage,
    pub split: SplitMessage,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ThreadDetailResponse {
    pub thread: EmailThread,
    pub messages: Vec<EmailMessageView>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct IngestEmailResponse {
    pub thread: EmailThread,
    pub message: EmailMessage,
    /// Message-ID 已存在，未重复写入
    pub duplicate: bool,
    pub created_thread: bool,
    pub link_reasons: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct AutoLinkResponse {
    pub thread: EmailThread,
    pub plan: LinkPlan,
}
