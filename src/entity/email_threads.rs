//! 邮件会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "email_threads")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub subject: String,
    pub normalized_subject: String,
    pub participant_email: String,
    pub participant_name: Option<String>,
    pub status: String,
    pub is_read: bool,
    pub assigned_to: Option<i64>,
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub case_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub return_id: Option<i64>,
    pub message_count: i32,
    pub last_message_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::email_messages::Entity")]
    Messages,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedTo",
        to = "super::users::Column::Id"
    )]
    Assignee,
}

impl Related<super::email_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_thread(self) -> crate::models::email_threads::entities::EmailThread {
        use crate::models::email_threads::entities::{EmailThread, ThreadStatus};

        EmailThread {
            id: self.id,
            subject: self.subject,
            normalized_subject: self.normalized_subject,
            participant_email: self.participant_email,
            participant_name: self.participant_name,
            status: self.status.parse().unwrap_or(ThreadStatus::Open),
            is_read: self.is_read,
            assigned_to: self.assigned_to,
            customer_id: self.customer_id,
            order_id: self.order_id,
            case_id: self.case_id,
            repair_id: self.repair_id,
            return_id: self.return_id,
            message_count: self.message_count,
            last_message_at: super::to_datetime(self.last_message_at),
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
