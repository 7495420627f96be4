use super::{SeaOrmStorage, now_ts};
use crate::entity::sync_states::{ActiveModel, Column, Entity as SyncStates};
use crate::errors::{Result, ThriftHubError};
use crate::models::sync::SyncState;
use sea_orm::sea_query::OnConflict;
use sea_orm::{EntityTrait, Set};

impl SeaOrmStorage {
    pub async fn get_sync_state_impl(&self, key: &str) -> Result<Option<SyncState>> {
        let result = SyncStates::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询同步状态失败: {e}")))?;

        Ok(result.map(|m| m.into_sync_state()))
    }

    /// 按 key 覆盖写入
    pub async fn save_sync_state_impl(&self, state: &SyncState) -> Result<SyncState> {
        let model = ActiveModel {
            key: Set(state.key.clone()),
            last_synced_at: Set(state.last_synced_at.map(|d| d.timestamp())),
            last_run_at: Set(state.last_run_at.map(|d| d.timestamp())),
            last_status: Set(state.last_status.to_string()),
            last_error: Set(state.last_error.clone()),
            items_synced: Set(state.items_synced),
            updated_at: Set(now_ts()),
        };

        SyncStates::insert(model)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([
                        Column::LastSyncedAt,
                        Column::LastRunAt,
                        Column::LastStatus,
                        Column::LastError,
                        Column::ItemsSynced,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("保存同步状态失败: {e}")))?;

        self.get_sync_state_impl(&state.key)
            .await?
            .ok_or_else(|| ThriftHubError::not_found(format!("同步状态不存在: {}", state.key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sync::{SHOPIFY_ORDERS_KEY, SyncStatus};

    #[tokio::test]
    async fn test_save_sync_state_upserts() {
        let storage = SeaOrmStorage::in_memory().await;
        assert!(storage.get_sync_state_impl(SHOPIFY_ORDERS_KEY).await.unwrap().is_none());

        let mut state = SyncState::idle(SHOPIFY_ORDERS_KEY);
        state.last_status = SyncStatus::Running;
        storage.save_sync_state_impl(&state).await.unwrap();

        state.last_status = SyncStatus::Failed;
        state.last_error = Some("401 Unauthorized".into());
        let saved = storage.save_sync_state_impl(&state).await.unwrap();

        assert_eq!(saved.last_status, SyncStatus::Failed);
        assert_eq!(saved.last_error.as_deref(), Some("401 Unauthorized"));
    }
}
