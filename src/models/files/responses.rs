use super::entities::Attachment;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct AttachmentListResponse {
    pub items: Vec<Attachment>,
}
