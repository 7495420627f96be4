//! Shopify 订单同步
//!
//! - `types`: Admin REST API 的订单结构
//! - `client`: 基于 reqwest 的 HTTP 客户端，按 `Link` 头翻页
//! - `mapping`: 把 Shopify 订单映射为本地订单（纯函数）

pub mod client;
pub mod mapping;
pub mod types;

pub use client::ShopifyClient;
pub use mapping::{map_order, merge_status, parse_cents};
pub use types::{OrdersPage, ShopifyOrder};

use crate::errors::Result;
use chrono::{DateTime, Utc};

/// 订单来源
///
/// 同步流程只依赖这个 trait，测试时可以换成内存实现。
#[async_trait::async_trait]
pub trait OrderSource: Send + Sync {
    /// 拉取一页订单。`page_info` 为上一页返回的游标
    async fn fetch_orders_page(
        &self,
        updated_at_min: Option<DateTime<Utc>>,
        page_info: Option<&str>,
    ) -> Result<OrdersPage>;
}
