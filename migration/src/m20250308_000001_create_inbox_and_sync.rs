use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_tables::{Cases, Customers, Orders, Repairs, Returns, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 邮件会话表 ====================
        manager
            .create_table(
                Table::create()
                    .table(EmailThreads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailThreads::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmailThreads::Subject).string().not_null())
                    .col(
                        ColumnDef::new(EmailThreads::NormalizedSubject)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailThreads::ParticipantEmail)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailThreads::ParticipantName)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(EmailThreads::Status).string().not_null())
                    .col(
                        ColumnDef::new(EmailThreads::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(EmailThreads::AssignedTo).big_integer().null())
                    .col(ColumnDef::new(EmailThreads::CustomerId).big_integer().null())
                    .col(ColumnDef::new(EmailThreads::OrderId).big_integer().null())
                    .col(ColumnDef::new(EmailThreads::CaseId).big_integer().null())
                    .col(ColumnDef::new(EmailThreads::RepairId).big_integer().null())
                    .col(ColumnDef::new(EmailThreads::ReturnId).big_integer().null())
                    .col(
                        ColumnDef::new(EmailThreads::MessageCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(EmailThreads::LastMessageAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailThreads::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailThreads::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::RepairId)
                            .to(Repairs::Table, Repairs::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailThreads::Table, EmailThreads::ReturnId)
                            .to(Returns::Table, Returns::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 邮件消息表 ====================
        manager
            .create_table(
                Table::create()
                    .table(EmailMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailMessages::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EmailMessages::ThreadId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailMessages::MessageId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(EmailMessages::InReplyTo).string().null())
                    .col(ColumnDef::new(EmailMessages::ReferenceIds).text().null())
                    .col(ColumnDef::new(EmailMessages::Direction).string().not_null())
                    .col(ColumnDef::new(EmailMessages::FromEmail).string().not_null())
                    .col(ColumnDef::new(EmailMessages::FromName).string().null())
                    .col(ColumnDef::new(EmailMessages::ToEmails).text().not_null())
                    .col(ColumnDef::new(EmailMessages::Subject).string().not_null())
                    .col(ColumnDef::new(EmailMessages::BodyText).text().null())
                    .col(ColumnDef::new(EmailMessages::BodyHtml).text().null())
                    .col(ColumnDef::new(EmailMessages::SentAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(EmailMessages::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmailMessages::Table, EmailMessages::ThreadId)
                            .to(EmailThreads::Table, EmailThreads::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 同步状态表 ====================
        manager
            .create_table(
                Table::create()
                    .table(SyncStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SyncStates::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SyncStates::LastSyncedAt).big_integer().null())
                    .col(ColumnDef::new(SyncStates::LastRunAt).big_integer().null())
                    .col(ColumnDef::new(SyncStates::LastStatus).string().not_null())
                    .col(ColumnDef::new(SyncStates::LastError).text().null())
                    .col(
                        ColumnDef::new(SyncStates::ItemsSynced)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(SyncStates::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_threads_last_message_at")
                    .table(EmailThreads::Table)
                    .col(EmailThreads::LastMessageAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_threads_subject_participant")
                    .table(EmailThreads::Table)
                    .col(EmailThreads::NormalizedSubject)
                    .col(EmailThreads::ParticipantEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_messages_thread_id")
                    .table(EmailMessages::Table)
                    .col(EmailMessages::ThreadId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailMessages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EmailThreads::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum EmailThreads {
    #[sea_orm(iden = "email_threads")]
    Table,
    Id,
    Subject,
    NormalizedSubject,
    ParticipantEmail,
    ParticipantName,
    Status,
    IsRead,
    AssignedTo,
    CustomerId,
    OrderId,
    CaseId,
    RepairId,
    ReturnId,
    MessageCount,
    LastMessageAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EmailMessages {
    #[sea_orm(iden = "email_messages")]
    Table,
    Id,
    ThreadId,
    MessageId,
    InReplyTo,
    ReferenceIds,
    Direction,
    FromEmail,
    FromName,
    ToEmails,
    Subject,
    BodyText,
    BodyHtml,
    SentAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum SyncStates {
    #[sea_orm(iden = "sync_states")]
    Table,
    Key,
    LastSyncedAt,
    LastRunAt,
    LastStatus,
    LastError,
    ItemsSynced,
    UpdatedAt,
}
