use crate::models::common::Priority;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 工单状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
    pub enum CaseStatus {
        Open => "open",
        InProgress => "in_progress",
        WaitingCustomer => "waiting_customer",
        Resolved => "resolved",
        Closed => "closed",
    }
}

impl CaseStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, CaseStatus::Resolved | CaseStatus::Closed)
    }
}

// 客服工单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct Case {
    pub id: i64,
    /// `CASE-XXXXXXXX`
    pub case_number: String,
    pub title: String,
    pub description: Option<String>,
    pub status: CaseStatus,
    pub priority: Priority,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub closed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
