//! 邮件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "email_messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub thread_id: i64,
    #[sea_orm(unique)]
    pub message_id: String,
    pub in_reply_to: Option<String>,
    /// References 头中的 Message-ID 列表（JSON 数组）
    #[sea_orm(column_type = "Text", nullable)]
    pub reference_ids: Option<String>,
    pub direction: String,
    pub from_email: String,
    pub from_name: Option<String>,
    /// JSON 数组
    #[sea_orm(column_type = "Text")]
    pub to_emails: String,
    pub subject: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub body_text: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub body_html: Option<String>,
    pub sent_at: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::email_threads::Entity",
        from = "Column::ThreadId",
        to = "super::email_threads::Column::Id"
    )]
    Thread,
}

impl Related<super::email_threads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Thread.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_message(self) -> crate::models::email_threads::entities::EmailMessage {
        use crate::models::email_threads::entities::{EmailMessage, MessageDirection};

        EmailMessage {
            id: self.id,
            thread_id: self.thread_id,
            message_id: self.message_id,
            in_reply_to: self.in_reply_to,
            references: super::parse_json_or_default(self.reference_ids.as_deref()),
            direction: self.direction.parse().unwrap_or(MessageDirection::Inbound),
            from_email: self.from_email,
            from_name: self.from_name,
            to_emails: super::parse_json_or_default(Some(&self.to_emails)),
            subject: self.subject,
            body_text: self.body_text,
            body_html: self.body_html,
            sent_at: super::to_datetime(self.sent_at),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
