use super::entities::Return;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct ReturnListResponse {
    pub items: Vec<Return>,
    pub pagination: PaginationInfo,
}
