use super::entities::{ReturnItem, ReturnStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct ReturnListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<ReturnStatus>,
    pub order_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct CreateReturnRequest {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub reason: Option<String>,
    pub status: Option<ReturnStatus>,
    pub tracking_number: Option<String>,
    pub refund_cents: Option<i64>,
    #[serde(default)]
    pub items: Vec<ReturnItem>,
    pub internal_notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct UpdateReturnRequest {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub reason: Option<String>,
    pub status: Option<ReturnStatus>,
    pub tracking_number: Option<String>,
    pub refund_cents: Option<i64>,
    pub items: Option<Vec<ReturnItem>>,
    pub internal_notes: Option<String>,
}

// 看板拖拽只改状态
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct UpdateReturnStatusRequest {
    pub status: ReturnStatus,
}
