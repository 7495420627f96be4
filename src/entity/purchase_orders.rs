//! 采购单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub po_number: String,
    pub supplier_name: String,
    pub supplier_reference: Option<String>,
    pub status: String,
    pub total_cents: i64,
    pub currency: String,
    pub expected_at: Option<i64>,
    pub received_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub items: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_purchase_order(self) -> crate::models::purchase_orders::entities::PurchaseOrder {
        use crate::models::purchase_orders::entities::{PurchaseOrder, PurchaseOrderStatus};

        PurchaseOrder {
            id: self.id,
            po_number: self.po_number,
            supplier_name: self.supplier_name,
            supplier_reference: self.supplier_reference,
            status: self.status.parse().unwrap_or(PurchaseOrderStatus::Draft),
            total_cents: self.total_cents,
            currency: self.currency,
            expected_at: super::to_opt_datetime(self.expected_at),
            received_at: super::to_opt_datetime(self.received_at),
            items: super::parse_json_or_default(self.items.as_deref()),
            notes: self.notes,
            created_by: self.created_by,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
