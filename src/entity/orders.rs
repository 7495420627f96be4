//! 订单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub external_id: Option<String>,
    #[sea_orm(unique)]
    pub order_number: String,
    pub customer_id: Option<i64>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub total_cents: i64,
    pub currency: String,
    pub status: String,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    /// JSON 数组
    #[sea_orm(column_type = "Text")]
    pub tracking_numbers: String,
    /// JSON 数组
    #[sea_orm(column_type = "Text")]
    pub line_items: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub shipping_address: Option<String>,
    pub ordered_at: Option<i64>,
    pub synced_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customer,
    #[sea_orm(has_many = "super::returns::Entity")]
    Returns,
    #[sea_orm(has_many = "super::repairs::Entity")]
    Repairs,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::returns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Returns.def()
    }
}

impl Related<super::repairs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repairs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_order(self) -> crate::models::orders::entities::Order {
        use crate::models::orders::entities::{Order, OrderStatus};

        Order {
            id: self.id,
            external_id: self.external_id,
            order_number: self.order_number,
            customer_id: self.customer_id,
            customer_email: self.customer_email,
            customer_name: self.customer_name,
            customer_phone: self.customer_phone,
            total_cents: self.total_cents,
            currency: self.currency,
            status: self
                .status
                .parse::<OrderStatus>()
                .unwrap_or(OrderStatus::Pending),
            financial_status: self.financial_status,
            fulfillment_status: self.fulfillment_status,
            tracking_numbers: super::parse_json_or_default(Some(&self.tracking_numbers)),
            line_items: super::parse_json_or_default(Some(&self.line_items)),
            shipping_address: self
                .shipping_address
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
            ordered_at: super::to_opt_datetime(self.ordered_at),
            synced_at: super::to_opt_datetime(self.synced_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
