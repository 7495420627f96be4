use super::entities::NoteEntityType;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct NoteListParams {
    pub entity_type: NoteEntityType,
    pub entity_id: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct CreateNoteRequest {
    pub entity_type: NoteEntityType,
    pub entity_id: i64,
    pub content: String,
}
