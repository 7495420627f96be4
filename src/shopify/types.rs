use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct OrdersEnvelope {
    #[serde(default)]
    pub orders: Vec<ShopifyOrder>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyOrder {
    pub id: i64,
    /// 展示用订单号，如 `#1001`
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<String>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub total_price: Option<String>,
    pub currency: Option<String>,
    pub customer: Option<ShopifyCustomer>,
    #[serde(default)]
    pub line_items: Vec<ShopifyLineItem>,
    #[serde(default)]
    pub fulfillments: Vec<ShopifyFulfillment>,
    pub shipping_address: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyCustomer {
    pub id: i64,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyLineItem {
    #[serde(default)]
    pub title: String,
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopifyFulfillment {
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub tracking_numbers: Vec<String>,
}

/// 一页订单和下一页游标
#[derive(Debug, Clone, Default)]
pub struct OrdersPage {
    pub orders: Vec<ShopifyOrder>,
    pub next_page_info: Option<String>,
}
