use super::entities::RepairStatus;
use crate::models::common::{PaginationQuery, Priority};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct RepairListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<RepairStatus>,
    pub assigned_to: Option<i64>,
    pub order_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct CreateRepairRequest {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub product_name: String,
    pub serial_number: Option<String>,
    pub issue_description: String,
    pub priority: Option<Priority>,
    pub assigned_to: Option<i64>,
    pub cost_cents: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct UpdateRepairRequest {
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub product_name: Option<String>,
    pub serial_number: Option<String>,
    pub issue_description: Option<String>,
    pub status: Option<RepairStatus>,
    pub priority: Option<Priority>,
    pub assigned_to: Option<i64>,
    pub cost_cents: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct UpdateRepairStatusRequest {
    pub status: RepairStatus,
}
