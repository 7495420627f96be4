use super::entities::{LineItem, OrderStatus};
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct OrderListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<OrderStatus>,
    pub customer_id: Option<i64>,
    /// 按订单号、客户邮箱、客户姓名搜索
    pub search: Option<String>,
}

// 手工创建订单（非 Shopify 来源）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct CreateOrderRequest {
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub total_cents: i64,
    pub currency: Option<String>,
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub tracking_numbers: Vec<String>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[ts(type = "Record<string, unknown> | null")]
    pub shipping_address: Option<serde_json::Value>,
    pub ordered_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct UpdateOrderRequest {
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub status: Option<OrderStatus>,
    pub tracking_numbers: Option<Vec<String>>,
    #[ts(type = "Record<string, unknown> | null")]
    pub shipping_address: Option<serde_json::Value>,
}
