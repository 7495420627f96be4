//! 工单实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub case_number: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub assigned_to: Option<i64>,
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_case(self) -> crate::models::cases::entities::Case {
        use crate::models::cases::entities::{Case, CaseStatus};

        Case {
            id: self.id,
            case_number: self.case_number,
            title: self.title,
            description: self.description,
            status: self.status.parse().unwrap_or(CaseStatus::Open),
            priority: self.priority.parse().unwrap_or_default(),
            customer_id: self.customer_id,
            order_id: self.order_id,
            assigned_to: self.assigned_to,
            closed_at: super::to_opt_datetime(self.closed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
