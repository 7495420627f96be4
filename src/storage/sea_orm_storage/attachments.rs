use super::SeaOrmStorage;
use crate::entity::attachments::{ActiveModel, Column, Entity as Attachments};
use crate::errors::{Result, ThriftHubError};
use crate::models::{files::entities::Attachment, notes::entities::NoteEntityType};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_attachment_impl(&self, attachment: Attachment) -> Result<Attachment> {
        let model = ActiveModel {
            download_token: Set(attachment.download_token),
            original_name: Set(attachment.original_name),
            stored_name: Set(attachment.stored_name),
            file_size: Set(attachment.file_size),
            content_type: Set(attachment.content_type),
            entity_type: Set(attachment.entity_type.map(|t| t.to_string())),
            entity_id: Set(attachment.entity_id),
            uploaded_by: Set(attachment.uploaded_by),
            created_at: Set(attachment.created_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("保存附件失败: {e}")))?;

        Ok(result.into_attachment())
    }

    pub async fn get_attachment_by_token_impl(&self, token: &str) -> Result<Option<Attachment>> {
        let result = Attachments::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询附件失败: {e}")))?;

        Ok(result.map(|m| m.into_attachment()))
    }

    pub async fn list_attachments_impl(
        &self,
        entity_type: NoteEntityType,
        entity_id: i64,
    ) -> Result<Vec<Attachment>> {
        let result = Attachments::find()
            .filter(Column::EntityType.eq(entity_type.as_str()))
            .filter(Column::EntityId.eq(entity_id))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询附件列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_attachment()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    #[tokio::test]
    async fn test_attachment_roundtrip_by_token() {
        let storage = SeaOrmStorage::in_memory().await;
        let uploader = seed_user(&storage, "uploader", UserRole::Agent).await;

        let saved = storage
            .create_attachment_impl(Attachment {
                download_token: "tok-123".into(),
                original_name: "schade.jpg".into(),
                stored_name: "2025/03/tok-123.jpg".into(),
                file_size: 2048,
                content_type: "image/jpeg".into(),
                entity_type: Some(NoteEntityType::Return),
                entity_id: Some(9),
                uploaded_by: uploader.id,
                created_at: chrono::Utc::now(),
            })
            .await
            .unwrap();
        assert_eq!(saved.stored_name, "2025/03/tok-123.jpg");

        let found = storage.get_attachment_by_token_impl("tok-123").await.unwrap();
        assert_eq!(found.map(|a| a.original_name), Some("schade.jpg".to_string()));

        let listed = storage
            .list_attachments_impl(NoteEntityType::Return, 9)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert!(storage
            .list_attachments_impl(NoteEntityType::Repair, 9)
            .await
            .unwrap()
            .is_empty());
    }
}
