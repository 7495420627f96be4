//! 退货单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "returns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub return_number: String,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub reason: Option<String>,
    pub status: String,
    pub tracking_number: Option<String>,
    pub refund_cents: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub items: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub internal_notes: Option<String>,
    pub received_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id"
    )]
    Order,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_return(self) -> crate::models::returns::entities::Return {
        use crate::models::returns::entities::{Return, ReturnStatus};

        Return {
            id: self.id,
            return_number: self.return_number,
            order_id: self.order_id,
            customer_id: self.customer_id,
            reason: self.reason,
            status: self
                .status
                .parse::<ReturnStatus>()
                .unwrap_or(ReturnStatus::Requested),
            tracking_number: self.tracking_number,
            refund_cents: self.refund_cents,
            items: super::parse_json_or_default(self.items.as_deref()),
            internal_notes: self.internal_notes,
            received_at: super::to_opt_datetime(self.received_at),
            completed_at: super::to_opt_datetime(self.completed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
