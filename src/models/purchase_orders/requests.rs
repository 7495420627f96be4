use super::entities::{PurchaseOrderItem, PurchaseOrderStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct PurchaseOrderListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<PurchaseOrderStatus>,
    /// 供应商名称包含
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct CreatePurchaseOrderRequest {
    pub supplier_name: String,
    pub supplier_reference: Option<String>,
    pub status: Option<PurchaseOrderStatus>,
    /// 不传时按明细合计
    pub total_cents: Option<i64>,
    pub currency: Option<String>,
    pub expected_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub items: Vec<PurchaseOrderItem>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct UpdatePurchaseOrderRequest {
    pub supplier_name: Option<String>,
    pub supplier_reference: Option<String>,
    pub status: Option<PurchaseOrderStatus>,
    pub total_cents: Option<i64>,
    pub currency: Option<String>,
    pub expected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub items: Option<Vec<PurchaseOrderItem>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct UpdatePurchaseOrderStatusRequest {
    pub status: PurchaseOrderStatus,
}
