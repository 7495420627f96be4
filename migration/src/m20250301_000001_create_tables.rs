use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建客户表
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Customers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Customers::ExternalId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Customers::Email).string().null())
                    .col(ColumnDef::new(Customers::FirstName).string().null())
                    .col(ColumnDef::new(Customers::LastName).string().null())
                    .col(ColumnDef::new(Customers::Phone).string().null())
                    .col(ColumnDef::new(Customers::Notes).text().null())
                    .col(
                        ColumnDef::new(Customers::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Customers::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建订单表
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::ExternalId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::CustomerId).big_integer().null())
                    .col(ColumnDef::new(Orders::CustomerEmail).string().null())
                    .col(ColumnDef::new(Orders::CustomerName).string().null())
                    .col(ColumnDef::new(Orders::CustomerPhone).string().null())
                    .col(
                        ColumnDef::new(Orders::TotalCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Orders::Currency).string().not_null())
                    .col(ColumnDef::new(Orders::Status).string().not_null())
                    .col(ColumnDef::new(Orders::FinancialStatus).string().null())
                    .col(ColumnDef::new(Orders::FulfillmentStatus).string().null())
                    .col(ColumnDef::new(Orders::TrackingNumbers).text().not_null())
                    .col(ColumnDef::new(Orders::LineItems).text().not_null())
                    .col(ColumnDef::new(Orders::ShippingAddress).text().null())
                    .col(ColumnDef::new(Orders::OrderedAt).big_integer().null())
                    .col(ColumnDef::new(Orders::SyncedAt).big_integer().null())
                    .col(ColumnDef::new(Orders::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Orders::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Orders::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Orders::Table, Orders::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建退货表
        manager
            .create_table(
                Table::create()
                    .table(Returns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Returns::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Returns::ReturnNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Returns::OrderId).big_integer().null())
                    .col(ColumnDef::new(Returns::CustomerId).big_integer().null())
                    .col(ColumnDef::new(Returns::Reason).text().null())
                    .col(ColumnDef::new(Returns::Status).string().not_null())
                    .col(ColumnDef::new(Returns::TrackingNumber).string().null())
                    .col(ColumnDef::new(Returns::RefundCents).big_integer().null())
                    .col(ColumnDef::new(Returns::Items).text().null())
                    .col(ColumnDef::new(Returns::InternalNotes).text().null())
                    .col(ColumnDef::new(Returns::ReceivedAt).big_integer().null())
                    .col(ColumnDef::new(Returns::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Returns::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Returns::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Returns::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Returns::Table, Returns::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Returns::Table, Returns::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建维修单表
        manager
            .create_table(
                Table::create()
                    .table(Repairs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repairs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Repairs::RepairNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Repairs::OrderId).big_integer().null())
                    .col(ColumnDef::new(Repairs::CustomerId).big_integer().null())
                    .col(ColumnDef::new(Repairs::CustomerName).string().null())
                    .col(ColumnDef::new(Repairs::CustomerEmail).string().null())
                    .col(ColumnDef::new(Repairs::CustomerPhone).string().null())
                    .col(ColumnDef::new(Repairs::ProductName).string().not_null())
                    .col(ColumnDef::new(Repairs::SerialNumber).string().null())
                    .col(ColumnDef::new(Repairs::IssueDescription).text().not_null())
                    .col(ColumnDef::new(Repairs::Status).string().not_null())
                    .col(ColumnDef::new(Repairs::Priority).string().not_null())
                    .col(ColumnDef::new(Repairs::AssignedTo).big_integer().null())
                    .col(ColumnDef::new(Repairs::CostCents).big_integer().null())
                    .col(ColumnDef::new(Repairs::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Repairs::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Repairs::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Repairs::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Repairs::Table, Repairs::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Repairs::Table, Repairs::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Repairs::Table, Repairs::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建工单（case）表
        manager
            .create_table(
                Table::create()
                    .table(Cases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cases::CaseNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cases::Title).string().not_null())
                    .col(ColumnDef::new(Cases::Description).text().null())
                    .col(ColumnDef::new(Cases::Status).string().not_null())
                    .col(ColumnDef::new(Cases::Priority).string().not_null())
                    .col(ColumnDef::new(Cases::CustomerId).big_integer().null())
                    .col(ColumnDef::new(Cases::OrderId).big_integer().null())
                    .col(ColumnDef::new(Cases::AssignedTo).big_integer().null())
                    .col(ColumnDef::new(Cases::ClosedAt).big_integer().null())
                    .col(ColumnDef::new(Cases::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Cases::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Cases::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cases::Table, Cases::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cases::Table, Cases::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Cases::Table, Cases::AssignedTo)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建待办表
        manager
            .create_table(
                Table::create()
                    .table(Todos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Todos::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Todos::Title).string().not_null())
                    .col(ColumnDef::new(Todos::Description).text().null())
                    .col(ColumnDef::new(Todos::Status).string().not_null())
                    .col(ColumnDef::new(Todos::Priority).string().not_null())
                    .col(ColumnDef::new(Todos::Scope).string().not_null())
                    .col(ColumnDef::new(Todos::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Todos::AssigneeId).big_integer().null())
                    .col(ColumnDef::new(Todos::DueAt).big_integer().null())
                    .col(ColumnDef::new(Todos::OrderId).big_integer().null())
                    .col(ColumnDef::new(Todos::CaseId).big_integer().null())
                    .col(ColumnDef::new(Todos::CompletedAt).big_integer().null())
                    .col(ColumnDef::new(Todos::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Todos::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Todos::DeletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Todos::Table, Todos::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Todos::Table, Todos::AssigneeId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Todos::Table, Todos::OrderId)
                            .to(Orders::Table, Orders::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Todos::Table, Todos::CaseId)
                            .to(Cases::Table, Cases::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建备注表（按实体类型 + 实体 ID 关联）
        manager
            .create_table(
                Table::create()
                    .table(Notes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notes::EntityType).string().not_null())
                    .col(ColumnDef::new(Notes::EntityId).big_integer().not_null())
                    .col(ColumnDef::new(Notes::AuthorId).big_integer().not_null())
                    .col(ColumnDef::new(Notes::Content).text().not_null())
                    .col(ColumnDef::new(Notes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Notes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Notes::Table, Notes::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建采购单表
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchaseOrders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::PoNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::SupplierName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::SupplierReference)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::TotalCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(PurchaseOrders::Currency).string().not_null())
                    .col(
                        ColumnDef::new(PurchaseOrders::ExpectedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::ReceivedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PurchaseOrders::Items).text().null())
                    .col(ColumnDef::new(PurchaseOrders::Notes).text().null())
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchaseOrders::DeletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PurchaseOrders::Table, PurchaseOrders::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建附件表
        manager
            .create_table(
                Table::create()
                    .table(Attachments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attachments::DownloadToken)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Attachments::OriginalName).string().not_null())
                    .col(ColumnDef::new(Attachments::StoredName).string().not_null())
                    .col(ColumnDef::new(Attachments::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Attachments::ContentType).string().not_null())
                    .col(ColumnDef::new(Attachments::EntityType).string().null())
                    .col(ColumnDef::new(Attachments::EntityId).big_integer().null())
                    .col(
                        ColumnDef::new(Attachments::UploadedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attachments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attachments::Table, Attachments::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer_id")
                    .table(Orders::Table)
                    .col(Orders::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_orders_customer_email")
                    .table(Orders::Table)
                    .col(Orders::CustomerEmail)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_customers_email")
                    .table(Customers::Table)
                    .col(Customers::Email)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_returns_order_id")
                    .table(Returns::Table)
                    .col(Returns::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_repairs_order_id")
                    .table(Repairs::Table)
                    .col(Repairs::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notes_entity")
                    .table(Notes::Table)
                    .col(Notes::EntityType)
                    .col(Notes::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_attachments_entity")
                    .table(Attachments::Table)
                    .col(Attachments::EntityType)
                    .col(Attachments::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Attachments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Notes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Todos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repairs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Returns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Customers {
    #[sea_orm(iden = "customers")]
    Table,
    Id,
    ExternalId,
    Email,
    FirstName,
    LastName,
    Phone,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Orders {
    #[sea_orm(iden = "orders")]
    Table,
    Id,
    ExternalId,
    OrderNumber,
    CustomerId,
    CustomerEmail,
    CustomerName,
    CustomerPhone,
    TotalCents,
    Currency,
    Status,
    FinancialStatus,
    FulfillmentStatus,
    TrackingNumbers,
    LineItems,
    ShippingAddress,
    OrderedAt,
    SyncedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Returns {
    #[sea_orm(iden = "returns")]
    Table,
    Id,
    ReturnNumber,
    OrderId,
    CustomerId,
    Reason,
    Status,
    TrackingNumber,
    RefundCents,
    Items,
    InternalNotes,
    ReceivedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Repairs {
    #[sea_orm(iden = "repairs")]
    Table,
    Id,
    RepairNumber,
    OrderId,
    CustomerId,
    CustomerName,
    CustomerEmail,
    CustomerPhone,
    ProductName,
    SerialNumber,
    IssueDescription,
    Status,
    Priority,
    AssignedTo,
    CostCents,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Cases {
    #[sea_orm(iden = "cases")]
    Table,
    Id,
    CaseNumber,
    Title,
    Description,
    Status,
    Priority,
    CustomerId,
    OrderId,
    AssignedTo,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Todos {
    #[sea_orm(iden = "todos")]
    Table,
    Id,
    Title,
    Description,
    Status,
    Priority,
    Scope,
    OwnerId,
    AssigneeId,
    DueAt,
    OrderId,
    CaseId,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Notes {
    #[sea_orm(iden = "notes")]
    Table,
    Id,
    EntityType,
    EntityId,
    AuthorId,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PurchaseOrders {
    #[sea_orm(iden = "purchase_orders")]
    Table,
    Id,
    PoNumber,
    SupplierName,
    SupplierReference,
    Status,
    TotalCents,
    Currency,
    ExpectedAt,
    ReceivedAt,
    Items,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum Attachments {
    #[sea_orm(iden = "attachments")]
    Table,
    DownloadToken,
    OriginalName,
    StoredName,
    FileSize,
    ContentType,
    EntityType,
    EntityId,
    UploadedBy,
    CreatedAt,
}
