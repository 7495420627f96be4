use crate::models::notes::entities::NoteEntityType;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/file.ts")]
pub struct AttachmentListParams {
    pub entity_type: NoteEntityType,
    pub entity_id: i64,
}
