use crate::models::orders::entities::{LineItem, OrderStatus};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Shopify 订单同步在 sync_states 表中的键
pub const SHOPIFY_ORDERS_KEY: &str = "shopify_orders";

define_string_enum! {
    #[derive(TS, Default)]
    #[ts(export, export_to = "../frontend/src/types/generated/sync.ts")]
    pub enum SyncStatus {
        #[default]
        Idle => "idle",
        Running => "running",
        Success => "success",
        Failed => "failed",
    }
}

// 同步状态
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sync.ts")]
pub struct SyncState {
    pub key: String,
    /// 已同步到的 Shopify updated_at 水位
    pub last_synced_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_run_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_status: SyncStatus,
    pub last_error: Option<String>,
    pub items_synced: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SyncState {
    pub fn idle(key: &str) -> Self {
        Self {
            key: key.to_string(),
            last_synced_at: None,
            last_run_at: None,
            last_status: SyncStatus::Idle,
            last_error: None,
            items_synced: 0,
            updated_at: chrono::Utc::now(),
        }
    }
}

// 一次同步的结果
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sync.ts")]
pub struct SyncReport {
    pub orders_created: i64,
    pub orders_updated: i64,
    pub customers_created: i64,
    pub returns_refunded: i64,
    pub pages: i64,
    pub last_synced_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SyncReport {
    pub fn orders_synced(&self) -> i64 {
        self.orders_created + self.orders_updated
    }
}

/// 从外部平台映射出的客户字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerUpsert {
    pub external_id: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// 从外部平台映射出的订单字段，写库前还要合并本地状态
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpsert {
    pub external_id: String,
    pub order_number: String,
    pub customer: Option<CustomerUpsert>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub total_cents: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub tracking_numbers: Vec<String>,
    pub line_items: Vec<LineItem>,
    pub shipping_address: Option<serde_json::Value>,
    pub ordered_at: Option<chrono::DateTime<chrono::Utc>>,
    /// 平台侧 updated_at，用于推进同步水位
    pub remote_updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sync.ts")]
pub struct SyncStatusResponse {
    pub state: SyncState,
    pub configured: bool,
    pub running: bool,
}
