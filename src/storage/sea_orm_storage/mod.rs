//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attachments;
mod cases;
mod customers;
mod email_threads;
mod notes;
mod orders;
mod purchase_orders;
mod repairs;
mod returns;
mod search;
mod sync_states;
mod todos;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, ThriftHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM storage ready, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ThriftHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .connect_with(opt)
            .await
            .map_err(|e| ThriftHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| ThriftHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 推断数据库类型
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ThriftHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 单个会话内的 SQLite 内存库，供测试使用
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Self {
        Self::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite should open")
    }
}

pub(crate) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::linking::ThreadLinks;
use crate::models::{
    cases::{
        entities::Case,
        requests::{CaseListParams, CreateCaseRequest, UpdateCaseRequest},
        responses::CaseListResponse,
    },
    customers::{
        entities::Customer,
        requests::{CreateCustomerRequest, CustomerListParams, UpdateCustomerRequest},
        responses::CustomerListResponse,
    },
    email_threads::{
        entities::{EmailMessage, EmailThread},
        requests::{IngestEmailRequest, NewEmailThread, ThreadListParams, UpdateThreadRequest},
        responses::ThreadListResponse,
    },
    files::entities::Attachment,
    notes::{
        entities::{Note, NoteEntityType},
        requests::CreateNoteRequest,
    },
    orders::{
        entities::{Order, OrderStatus},
        requests::{CreateOrderRequest, OrderListParams, UpdateOrderRequest},
        responses::OrderListResponse,
    },
    purchase_orders::{
        entities::PurchaseOrder,
        requests::{
            CreatePurchaseOrderRequest, PurchaseOrderListParams, UpdatePurchaseOrderRequest,
        },
        responses::PurchaseOrderListResponse,
    },
    repairs::{
        entities::Repair,
        requests::{CreateRepairRequest, RepairListParams, UpdateRepairRequest},
        responses::RepairListResponse,
    },
    returns::{
        entities::Return,
        requests::{CreateReturnRequest, ReturnListParams, UpdateReturnRequest},
        responses::ReturnListResponse,
    },
    search::SearchResponse,
    sync::{OrderUpsert, SyncState},
    todos::{
        entities::Todo,
        requests::{CreateTodoRequest, TodoListParams, UpdateTodoRequest},
        responses::TodoListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListParams) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 客户模块
    async fn create_customer(&self, req: CreateCustomerRequest) -> Result<Customer> {
        self.create_customer_impl(req).await
    }

    async fn get_customer_by_id(&self, id: i64) -> Result<Option<Customer>> {
        self.get_customer_by_id_impl(id).await
    }

    async fn get_customer_by_external_id(&self, external_id: &str) -> Result<Option<Customer>> {
        self.get_customer_by_external_id_impl(external_id).await
    }

    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        self.get_customer_by_email_impl(email).await
    }

    async fn list_customers_with_pagination(
        &self,
        query: CustomerListParams,
    ) -> Result<CustomerListResponse> {
        self.list_customers_with_pagination_impl(query).await
    }

    async fn update_customer(
        &self,
        id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>> {
        self.update_customer_impl(id, update).await
    }

    // 订单模块
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order> {
        self.create_order_impl(req).await
    }

    async fn get_order_by_id(&self, id: i64) -> Result<Option<Order>> {
        self.get_order_by_id_impl(id).await
    }

    async fn get_order_by_external_id(&self, external_id: &str) -> Result<Option<Order>> {
        self.get_order_by_external_id_impl(external_id).await
    }

    async fn get_order_by_number(&self, order_number: &str) -> Result<Option<Order>> {
        self.get_order_by_number_impl(order_number).await
    }

    async fn find_orders_by_numbers(&self, candidates: &[String]) -> Result<Vec<Order>> {
        self.find_orders_by_numbers_impl(candidates).await
    }

    async fn list_orders_by_customer(&self, customer_id: i64) -> Result<Vec<Order>> {
        self.list_orders_by_customer_impl(customer_id).await
    }

    async fn list_orders_with_pagination(
        &self,
        query: OrderListParams,
    ) -> Result<OrderListResponse> {
        self.list_orders_with_pagination_impl(query).await
    }

    async fn update_order(&self, id: i64, update: UpdateOrderRequest) -> Result<Option<Order>> {
        self.update_order_impl(id, update).await
    }

    async fn delete_order(&self, id: i64) -> Result<bool> {
        self.delete_order_impl(id).await
    }

    async fn upsert_synced_order(
        &self,
        existing_id: Option<i64>,
        upsert: &OrderUpsert,
        customer_id: Option<i64>,
        status: OrderStatus,
    ) -> Result<(Order, bool)> {
        self.upsert_synced_order_impl(existing_id, upsert, customer_id, status)
            .await
    }

    // 退货模块
    async fn create_return(&self, req: CreateReturnRequest) -> Result<Return> {
        self.create_return_impl(req).await
    }

    async fn get_return_by_id(&self, id: i64) -> Result<Option<Return>> {
        self.get_return_by_id_impl(id).await
    }

    async fn list_returns_by_order(&self, order_id: i64) -> Result<Vec<Return>> {
        self.list_returns_by_order_impl(order_id).await
    }

    async fn list_returns_with_pagination(
        &self,
        query: ReturnListParams,
    ) -> Result<ReturnListResponse> {
        self.list_returns_with_pagination_impl(query).await
    }

    async fn update_return(&self, id: i64, update: UpdateReturnRequest) -> Result<Option<Return>> {
        self.update_return_impl(id, update).await
    }

    async fn delete_return(&self, id: i64) -> Result<bool> {
        self.delete_return_impl(id).await
    }

    async fn refund_approved_returns(&self, order_id: i64) -> Result<u64> {
        self.refund_approved_returns_impl(order_id).await
    }

    // 维修模块
    async fn create_repair(&self, req: CreateRepairRequest) -> Result<Repair> {
        self.create_repair_impl(req).await
    }

    async fn get_repair_by_id(&self, id: i64) -> Result<Option<Repair>> {
        self.get_repair_by_id_impl(id).await
    }

    async fn list_repairs_by_order(&self, order_id: i64) -> Result<Vec<Repair>> {
        self.list_repairs_by_order_impl(order_id).await
    }

    async fn list_repairs_with_pagination(
        &self,
        query: RepairListParams,
    ) -> Result<RepairListResponse> {
        self.list_repairs_with_pagination_impl(query).await
    }

    async fn update_repair(&self, id: i64, update: UpdateRepairRequest) -> Result<Option<Repair>> {
        self.update_repair_impl(id, update).await
    }

    async fn delete_repair(&self, id: i64) -> Result<bool> {
        self.delete_repair_impl(id).await
    }

    // 待办模块
    async fn create_todo(&self, owner_id: i64, req: CreateTodoRequest) -> Result<Todo> {
        self.create_todo_impl(owner_id, req).await
    }

    async fn get_todo_by_id(&self, id: i64) -> Result<Option<Todo>> {
        self.get_todo_by_id_impl(id).await
    }

    async fn list_todos_with_pagination(
        &self,
        query: TodoListParams,
        viewer: Option<i64>,
    ) -> Result<TodoListResponse> {
        self.list_todos_with_pagination_impl(query, viewer).await
    }

    async fn update_todo(&self, id: i64, update: UpdateTodoRequest) -> Result<Option<Todo>> {
        self.update_todo_impl(id, update).await
    }

    async fn delete_todo(&self, id: i64) -> Result<bool> {
        self.delete_todo_impl(id).await
    }

    // 工单模块
    async fn create_case(&self, req: CreateCaseRequest) -> Result<Case> {
        self.create_case_impl(req).await
    }

    async fn get_case_by_id(&self, id: i64) -> Result<Option<Case>> {
        self.get_case_by_id_impl(id).await
    }

    async fn list_cases_with_pagination(&self, query: CaseListParams) -> Result<CaseListResponse> {
        self.list_cases_with_pagination_impl(query).await
    }

    async fn update_case(&self, id: i64, update: UpdateCaseRequest) -> Result<Option<Case>> {
        self.update_case_impl(id, update).await
    }

    async fn delete_case(&self, id: i64) -> Result<bool> {
        self.delete_case_impl(id).await
    }

    // 备注模块
    async fn create_note(&self, author_id: i64, req: CreateNoteRequest) -> Result<Note> {
        self.create_note_impl(author_id, req).await
    }

    async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        self.get_note_by_id_impl(id).await
    }

    async fn list_notes(&self, entity_type: NoteEntityType, entity_id: i64) -> Result<Vec<Note>> {
        self.list_notes_impl(entity_type, entity_id).await
    }

    async fn delete_note(&self, id: i64) -> Result<bool> {
        self.delete_note_impl(id).await
    }

    // 邮件模块
    async fn get_thread_by_id(&self, id: i64) -> Result<Option<EmailThread>> {
        self.get_thread_by_id_impl(id).await
    }

    async fn list_threads_with_pagination(
        &self,
        query: ThreadListParams,
    ) -> Result<ThreadListResponse> {
        self.list_threads_with_pagination_impl(query).await
    }

    async fn list_threads_by_order(&self, order_id: i64) -> Result<Vec<EmailThread>> {
        self.list_threads_by_order_impl(order_id).await
    }

    async fn get_message_by_message_id(&self, message_id: &str) -> Result<Option<EmailMessage>> {
        self.get_message_by_message_id_impl(message_id).await
    }

    async fn find_thread_by_message_ids(
        &self,
        message_ids: &[String],
    ) -> Result<Option<EmailThread>> {
        self.find_thread_by_message_ids_impl(message_ids).await
    }

    async fn find_open_thread_by_subject(
        &self,
        normalized_subject: &str,
        participant_email: &str,
    ) -> Result<Option<EmailThread>> {
        self.find_open_thread_by_subject_impl(normalized_subject, participant_email)
            .await
    }

    async fn create_thread(&self, thread: NewEmailThread) -> Result<EmailThread> {
        self.create_thread_impl(thread).await
    }

    async fn append_message(
        &self,
        thread_id: i64,
        req: &IngestEmailRequest,
        sent_at: DateTime<Utc>,
    ) -> Result<(EmailMessage, EmailThread)> {
        self.append_message_impl(thread_id, req, sent_at).await
    }

    async fn list_thread_messages(&self, thread_id: i64) -> Result<Vec<EmailMessage>> {
        self.list_thread_messages_impl(thread_id).await
    }

    async fn update_thread(
        &self,
        id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<EmailThread>> {
        self.update_thread_impl(id, update).await
    }

    async fn set_thread_links(&self, id: i64, links: &ThreadLinks) -> Result<Option<EmailThread>> {
        self.set_thread_links_impl(id, links).await
    }

    async fn delete_thread(&self, id: i64) -> Result<bool> {
        self.delete_thread_impl(id).await
    }

    // 采购单模块
    async fn create_purchase_order(
        &self,
        created_by: i64,
        req: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrder> {
        self.create_purchase_order_impl(created_by, req).await
    }

    async fn get_purchase_order_by_id(&self, id: i64) -> Result<Option<PurchaseOrder>> {
        self.get_purchase_order_by_id_impl(id).await
    }

    async fn list_purchase_orders_with_pagination(
        &self,
        query: PurchaseOrderListParams,
    ) -> Result<PurchaseOrderListResponse> {
        self.list_purchase_orders_with_pagination_impl(query).await
    }

    async fn update_purchase_order(
        &self,
        id: i64,
        update: UpdatePurchaseOrderRequest,
    ) -> Result<Option<PurchaseOrder>> {
        self.update_purchase_order_impl(id, update).await
    }

    async fn delete_purchase_order(&self, id: i64) -> Result<bool> {
        self.delete_purchase_order_impl(id).await
    }

    // 附件模块
    async fn create_attachment(&self, attachment: Attachment) -> Result<Attachment> {
        self.create_attachment_impl(attachment).await
    }

    async fn get_attachment_by_token(&self, token: &str) -> Result<Option<Attachment>> {
        self.get_attachment_by_token_impl(token).await
    }

    async fn list_attachments(
        &self,
        entity_type: NoteEntityType,
        entity_id: i64,
    ) -> Result<Vec<Attachment>> {
        self.list_attachments_impl(entity_type, entity_id).await
    }

    // 搜索
    async fn search(
        &self,
        term: &str,
        order_digits: &[String],
        limit: u64,
    ) -> Result<SearchResponse> {
        self.search_impl(term, order_digits, limit).await
    }

    // 同步状态
    async fn get_sync_state(&self, key: &str) -> Result<Option<SyncState>> {
        self.get_sync_state_impl(key).await
    }

    async fn save_sync_state(&self, state: &SyncState) -> Result<SyncState> {
        self.save_sync_state_impl(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("thrifthub.db").unwrap(),
            "sqlite://thrifthub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@db/thrifthub").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[tokio::test]
    async fn test_in_memory_migrates() {
        let storage = SeaOrmStorage::in_memory().await;
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }
}
