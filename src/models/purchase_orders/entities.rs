use serde::{Deserialize, Serialize};
use ts_rs::TS;

define_string_enum! {
    // 采购单状态
    #[derive(TS)]
    #[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
    pub enum PurchaseOrderStatus {
        Draft => "draft",
        Ordered => "ordered",
        PartiallyReceived => "partially_received",
        Received => "received",
        Cancelled => "cancelled",
    }
}

// 采购明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct PurchaseOrderItem {
    pub description: String,
    pub sku: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub received_quantity: i64,
    pub unit_cost_cents: i64,
}

/// 明细合计（分）
pub fn items_total_cents(items: &[PurchaseOrderItem]) -> i64 {
    items
        .iter()
        .map(|item| item.quantity.saturating_mul(item.unit_cost_cents))
        .sum()
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/purchase_order.ts")]
pub struct PurchaseOrder {
    pub id: i64,
    /// `PO-XXXXXXXX`
    pub po_number: String,
    pub supplier_name: String,
    pub supplier_reference: Option<String>,
    pub status: PurchaseOrderStatus,
    pub total_cents: i64,
    pub currency: String,
    pub expected_at: Option<chrono::DateTime<chrono::Utc>>,
    pub received_at: Option<chrono::DateTime<chrono::Utc>>,
    pub items: Vec<PurchaseOrderItem>,
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_total() {
        let items = vec![
            PurchaseOrderItem {
                description: "Levi's 501".into(),
                sku: Some("LV501".into()),
                quantity: 3,
                received_quantity: 0,
                unit_cost_cents: 1250,
            },
            PurchaseOrderItem {
                description: "Wax jacket".into(),
                sku: None,
                quantity: 1,
                received_quantity: 1,
                unit_cost_cents: 4000,
            },
        ];
        assert_eq!(items_total_cents(&items), 7750);
        assert_eq!(items_total_cents(&[]), 0);
    }
}
