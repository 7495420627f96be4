use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 订单状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
    pub enum OrderStatus {
        Pending => "pending",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
        Refunded => "refunded",
    }
}

// 订单行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct LineItem {
    pub title: String,
    pub sku: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
}

// 订单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/order.ts")]
pub struct Order {
    pub id: i64,
    pub external_id: Option<String>,
    /// 展示用订单号，例如 `#1001`
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub total_cents: i64,
    pub currency: String,
    pub status: OrderStatus,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub tracking_numbers: Vec<String>,
    pub line_items: Vec<LineItem>,
    #[ts(type = "Record<string, unknown> | null")]
    pub shipping_address: Option<serde_json::Value>,
    pub ordered_at: Option<chrono::DateTime<chrono::Utc>>,
    pub synced_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Order {
    /// 订单号中的纯数字部分，用于与邮件中提取的订单号比对
    pub fn number_digits(&self) -> String {
        self.order_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    }
}
