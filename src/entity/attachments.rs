//! 附件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub download_token: String,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub uploaded_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attachment(self) -> crate::models::files::entities::Attachment {
        crate::models::files::entities::Attachment {
            download_token: self.download_token,
            original_name: self.original_name,
            stored_name: self.stored_name,
            file_size: self.file_size,
            content_type: self.content_type,
            entity_type: self.entity_type.and_then(|t| t.parse().ok()),
            entity_id: self.entity_id,
            uploaded_by: self.uploaded_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
