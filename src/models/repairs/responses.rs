use super::entities::Repair;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/repair.ts")]
pub struct RepairListResponse {
    pub items: Vec<Repair>,
    pub pagination: PaginationInfo,
}
