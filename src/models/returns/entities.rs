use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 退货状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
    pub enum ReturnStatus {
        Requested => "requested",
        InTransit => "in_transit",
        Received => "received",
        Inspecting => "inspecting",
        ApprovedRefund => "approved_refund",
        ApprovedExchange => "approved_exchange",
        Refunded => "refunded",
        Reshipped => "reshipped",
        Rejected => "rejected",
        Closed => "closed",
    }
}

impl ReturnStatus {
    /// 终态：退款完成、已换货寄出、拒绝或关闭
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReturnStatus::Refunded
                | ReturnStatus::Reshipped
                | ReturnStatus::Rejected
                | ReturnStatus::Closed
        )
    }
}

// 退货商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct ReturnItem {
    pub title: String,
    pub sku: Option<String>,
    pub quantity: i64,
}

// 退货单
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/return.ts")]
pub struct Return {
    pub id: i64,
    /// `RET-XXXXXXXX`
    pub return_number: String,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub reason: Option<String>,
    pub status: ReturnStatus,
    pub tracking_number: Option<String>,
    pub refund_cents: Option<i64>,
    pub items: Vec<ReturnItem>,
    pub internal_notes: Option<String>,
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = ReturnStatus::ALL
            .iter()
            .filter(|s| s.is_terminal())
            .map(|s| s.as_str())
            .collect();
        assert_eq!(terminal, vec!["refunded", "reshipped", "rejected", "closed"]);
    }
}
