use super::{SeaOrmStorage, now_ts};
use crate::entity::notes::{ActiveModel, Column, Entity as Notes};
use crate::errors::{Result, ThriftHubError};
use crate::models::notes::{
    entities::{Note, NoteEntityType},
    requests::CreateNoteRequest,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_note_impl(&self, author_id: i64, req: CreateNoteRequest) -> Result<Note> {
        let now = now_ts();

        let model = ActiveModel {
            entity_type: Set(req.entity_type.to_string()),
            entity_id: Set(req.entity_id),
            author_id: Set(author_id),
            content: Set(req.content),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建备注失败: {e}")))?;

        Ok(result.into_note())
    }

    pub async fn get_note_by_id_impl(&self, id: i64) -> Result<Option<Note>> {
        let result = Notes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询备注失败: {e}")))?;

        Ok(result.map(|m| m.into_note()))
    }

    /// 某条记录下的全部备注，最新的在前
    pub async fn list_notes_impl(
        &self,
        entity_type: NoteEntityType,
        entity_id: i64,
    ) -> Result<Vec<Note>> {
        let result = Notes::find()
            .filter(Column::EntityType.eq(entity_type.as_str()))
            .filter(Column::EntityId.eq(entity_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询备注列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_note()).collect())
    }

    pub async fn delete_note_impl(&self, id: i64) -> Result<bool> {
        let result = Notes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除备注失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    #[tokio::test]
    async fn test_notes_scoped_to_entity() {
        let storage = SeaOrmStorage::in_memory().await;
        let author = seed_user(&storage, "noteuser", UserRole::Agent).await;

        for (entity_type, entity_id, content) in [
            (NoteEntityType::Order, 1, "Klant belde"),
            (NoteEntityType::Order, 1, "Verzonden met PostNL"),
            (NoteEntityType::Order, 2, "Ander order"),
            (NoteEntityType::Case, 1, "Case notitie"),
        ] {
            storage
                .create_note_impl(
                    author.id,
                    CreateNoteRequest {
                        entity_type,
                        entity_id,
                        content: content.into(),
                    },
                )
                .await
                .unwrap();
        }

        let notes = storage
            .list_notes_impl(NoteEntityType::Order, 1)
            .await
            .unwrap();
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.author_id == author.id));

        assert!(storage.delete_note_impl(notes[0].id).await.unwrap());
        assert!(storage.get_note_by_id_impl(notes[0].id).await.unwrap().is_none());
    }
}
