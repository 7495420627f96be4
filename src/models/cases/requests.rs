use super::entities::CaseStatus;
use crate::models::common::{PaginationQuery, Priority};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<CaseStatus>,
    pub assigned_to: Option<i64>,
    pub customer_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CreateCaseRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct UpdateCaseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<CaseStatus>,
    pub priority: Option<Priority>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub assigned_to: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct UpdateCaseStatusRequest {
    pub status: CaseStatus,
}
