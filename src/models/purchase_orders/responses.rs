use super::entities::PurchaseOrder;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct PurchaseOrderListResponse {
    pub items: Vec<PurchaseOrder>,
    pub pagination: PaginationInfo,
}
