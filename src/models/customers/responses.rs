use super::entities::Customer;
use crate::models::common::PaginationInfo;
use crate::models::orders::entities::Order;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/customer.ts")]
pub struct CustomerListResponse {
    pub items: Vec<Customer>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/customer.ts")]
pub struct CustomerDetailResponse {
    pub customer: Customer,
    pub orders: Vec<Order>,
}
