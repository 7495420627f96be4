//! 维修单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "repairs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub repair_number: String,
    pub order_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub product_name: String,
    pub serial_number: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub issue_description: String,
    pub status: String,
    pub priority: String,
    pub assigned_to: Option<i64>,
    pub cost_cents: Option<i64>,
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
    pub fn into_repair(self) -> crate::models::repairs::entities::Repair {
        use crate::models::repairs::entities::{Repair, RepairStatus};

        Repair {
            id: self.id,
            repair_number: self.repair_number,
            order_id: self.order_id,
            customer_id: self.customer_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            product_name: self.product_name,
            serial_number: self.serial_number,
            issue_description: self.issue_description,
            status: self.status.parse().unwrap_or(RepairStatus::New),
            priority: self.priority.parse().unwrap_or_default(),
            assigned_to: self.assigned_to,
            cost_cents: self.cost_cents,
            completed_at: super::to_opt_datetime(self.completed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
