use crate::models::notes::entities::NoteEntityType;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 附件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct Attachment {
    /// 下载令牌，同时作为主键
    pub download_token: String,
    pub original_name: String,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
    /// 附件所属记录，与备注共用类型
    pub entity_type: Option<NoteEntityType>,
    pub entity_id: Option<i64>,
    pub uploaded_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
