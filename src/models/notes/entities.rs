use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 备注可以挂在这些记录上
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
    pub enum NoteEntityType {
        Order => "order",
        Return => "return",
        Repair => "repair",
        Case => "case",
        Customer => "customer",
        EmailThread => "email_thread",
        PurchaseOrder => "purchase_order",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/note.ts")]
pub struct Note {
    pub id: i64,
    pub entity_type: NoteEntityType,
    pub entity_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
