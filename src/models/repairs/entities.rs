use crate::models::common::Priority;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 维修状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
    pub enum RepairStatus {
        New => "new",
        Diagnosing => "diagnosing",
        WaitingParts => "waiting_parts",
        InRepair => "in_repair",
        Ready => "ready",
        Returned => "returned",
        Cancelled => "cancelled",
    }
}

impl RepairStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RepairStatus::Returned | RepairStatus::Cancelled)
    }
}

// 维修单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct Repair {
    pub id: i64,
    /// `REP-XXXXXXXX`
    pub repair_number: String,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub product_name: String,
    pub serial_number: Option<String>,
    pub issue_description: String,
    pub status: RepairStatus,
    pub priority: Priority,
    pub assigned_to: Option<i64>,
    pub cost_cents: Option<i64>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
