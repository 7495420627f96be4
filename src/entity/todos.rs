//! 待办实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: String,
    pub priority: String,
    pub scope: String,
    pub owner_id: i64,
    pub assignee_id: Option<i64>,
    pub due_at: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
    pub deleted_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_todo(self) -> crate::models::todos::entities::Todo {
        use crate::models::todos::entities::{Todo, TodoScope, TodoStatus};

        Todo {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status.parse().unwrap_or(TodoStatus::Todo),
            priority: self.priority.parse().unwrap_or_default(),
            scope: self.scope.parse().unwrap_or(TodoScope::Personal),
            owner_id: self.owner_id,
            assignee_id: self.assignee_id,
            due_at: super::to_opt_datetime(self.due_at),
            order_id: self.order_id,
            case_id: self.case_id,
            completed_at: super::to_opt_datetime(self.completed_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
