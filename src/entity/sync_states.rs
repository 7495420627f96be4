//! 同步状态实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_states")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    pub last_synced_at: Option<i64>,
    pub last_run_at: Option<i64>,
    pub last_status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub last_error: Option<String>,
    pub items_synced: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_sync_state(self) -> crate::models::sync::SyncState {
        crate::models::sync::SyncState {
            key: self.key,
            last_synced_at: super::to_opt_datetime(self.last_synced_at),
            last_run_at: super::to_opt_datetime(self.last_run_at),
            last_status: self.last_status.parse().unwrap_or_default(),
            last_error: self.last_error,
            items_synced: self.items_synced,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
