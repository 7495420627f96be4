use super::entities::Case;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseListResponse {
    pub items: Vec<Case>,
    pub pagination: PaginationInfo,
}
