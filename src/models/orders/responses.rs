use super::entities::Order;
use crate::models::common::PaginationInfo;
use crate::models::email_threads::entities::EmailThread;
use crate::models::repairs::entities::Repair;
use crate::models::returns::entities::Return;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct OrderListResponse {
    pub items: Vec<Order>,
    pub pagination: PaginationInfo,
}

// 订单详情，附带关联的退货、维修和邮件会话
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct OrderDetailResponse {
    pub order: Order,
    pub returns: Vec<Return>,
    pub repairs: Vec<Repair>,
    pub email_threads: Vec<EmailThread>,
}
