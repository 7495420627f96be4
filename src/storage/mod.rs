use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 登录时用户名或邮箱都可以
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListParams) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;

    /// 客户
    async fn create_customer(&self, req: CreateCustomerRequest) -> Result<Customer>;
    async fn get_customer_by_id(&self, id: i64) -> Result<Option<Customer>>;
    async fn get_customer_by_external_id(&self, external_id: &str) -> Result<Option<Customer>>;
    // 邮箱大小写不敏感
    async fn get_customer_by_email(&self, email: &str) -> Result<Option<Customer>>;
    async fn list_customers_with_pagination(
        &self,
        query: CustomerListParams,
    ) -> Result<CustomerListResponse>;
    async fn update_customer(
        &self,
        id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>>;

    /// 订单
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Order>;
    async fn get_order_by_id(&self, id: i64) -> Result<Option<Order>>;
    async fn get_order_by_external_id(&self, external_id: &str) -> Result<Option<Order>>;
    async fn get_order_by_number(&self, order_number: &str) -> Result<Option<Order>>;
    // 按订单号精确匹配多个候选写法（`#1001`、`1001`、`DT1001`）
    async fn find_orders_by_numbers(&self, candidates: &[String]) -> Result<Vec<Order>>;
    async fn list_orders_by_customer(&self, customer_id: i64) -> Result<Vec<Order>>;
    async fn list_orders_with_pagination(
        &self,
        query: OrderListParams,
    ) -> Result<OrderListResponse>;
    async fn update_order(&self, id: i64, update: UpdateOrderRequest) -> Result<Option<Order>>;
    async fn delete_order(&self, id: i64) -> Result<bool>;
    // 同步写入：existing_id 为空时插入，否则覆盖远端字段。返回 (订单, 是否新建)
    async fn upsert_synced_order(
        &self,
        existing_id: Option<i64>,
        upsert: &OrderUpsert,
        customer_id: Option<i64>,
        status: OrderStatus,
    ) -> Result<(Order, bool)>;

    /// 退货
    async fn create_return(&self, req: CreateReturnRequest) -> Result<Return>;
    async fn get_return_by_id(&self, id: i64) -> Result<Option<Return>>;
    async fn list_returns_by_order(&self, order_id: i64) -> Result<Vec<Return>>;
    async fn list_returns_with_pagination(
        &self,
        query: ReturnListParams,
    ) -> Result<ReturnListResponse>;
    // 状态变化时同时维护 received_at / completed_at
    async fn update_return(&self, id: i64, update: UpdateReturnRequest) -> Result<Option<Return>>;
    async fn delete_return(&self, id: i64) -> Result<bool>;
    // 订单已退款时，把 approved_refund 的退货推进到 refunded，返回影响条数
    async fn refund_approved_returns(&self, order_id: i64) -> Result<u64>;

    /// 维修
    async fn create_repair(&self, req: CreateRepairRequest) -> Result<Repair>;
    async fn get_repair_by_id(&self, id: i64) -> Result<Option<Repair>>;
    async fn list_repairs_by_order(&self, order_id: i64) -> Result<Vec<Repair>>;
    async fn list_repairs_with_pagination(
        &self,
        query: RepairListParams,
    ) -> Result<RepairListResponse>;
    async fn update_repair(&self, id: i64, update: UpdateRepairRequest) -> Result<Option<Repair>>;
    async fn delete_repair(&self, id: i64) -> Result<bool>;

    /// 待办
    async fn create_todo(&self, owner_id: i64, req: CreateTodoRequest) -> Result<Todo>;
    async fn get_todo_by_id(&self, id: i64) -> Result<Option<Todo>>;
    // viewer 为 None 时不做可见性过滤（管理员）
    async fn list_todos_with_pagination(
        &self,
        query: TodoListParams,
        viewer: Option<i64>,
    ) -> Result<TodoListResponse>;
    async fn update_todo(&self, id: i64, update: UpdateTodoRequest) -> Result<Option<Todo>>;
    async fn delete_todo(&self, id: i64) -> Result<bool>;

    /// 工单
    async fn create_case(&self, req: CreateCaseRequest) -> Result<Case>;
    async fn get_case_by_id(&self, id: i64) -> Result<Option<Case>>;
    async fn list_cases_with_pagination(&self, query: CaseListParams) -> Result<CaseListResponse>;
    async fn update_case(&self, id: i64, update: UpdateCaseRequest) -> Result<Option<Case>>;
    async fn delete_case(&self, id: i64) -> Result<bool>;

    /// 备注
    async fn create_note(&self, author_id: i64, req: CreateNoteRequest) -> Result<Note>;
    async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>>;
    async fn list_notes(&self, entity_type: NoteEntityType, entity_id: i64) -> Result<Vec<Note>>;
    async fn delete_note(&self, id: i64) -> Result<bool>;

    /// 邮件会话
    async fn get_thread_by_id(&self, id: i64) -> Result<Option<EmailThread>>;
    async fn list_threads_with_pagination(
        &self,
        query: ThreadListParams,
    ) -> Result<ThreadListResponse>;
    async fn list_threads_by_order(&self, order_id: i64) -> Result<Vec<EmailThread>>;
    async fn get_message_by_message_id(&self, message_id: &str) -> Result<Option<EmailMessage>>;
    // 任一 Message-ID 已存在时返回其所在会话
    async fn find_thread_by_message_ids(&self, message_ids: &[String])
    -> Result<Option<EmailThread>>;
    // 同一对方邮箱、同一归一化主题的 open/pending 会话，取最近活跃的一个
    async fn find_open_thread_by_subject(
        &self,
        normalized_subject: &str,
        participant_email: &str,
    ) -> Result<Option<EmailThread>>;
    async fn create_thread(&self, thread: NewEmailThread) -> Result<EmailThread>;
    // 写入邮件并刷新会话计数、时间，同一事务内完成。入站邮件标为未读并重新打开已关闭的会话。
    // Message-ID 重复返回 Conflict，会话不存在返回 NotFound
    async fn append_message(
        &self,
        thread_id: i64,
        req: &IngestEmailRequest,
        sent_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(EmailMessage, EmailThread)>;
    // 按时间正序
    async fn list_thread_messages(&self, thread_id: i64) -> Result<Vec<EmailMessage>>;
    async fn update_thread(
        &self,
        id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<EmailThread>>;
    async fn set_thread_links(&self, id: i64, links: &ThreadLinks) -> Result<Option<EmailThread>>;
    async fn delete_thread(&self, id: i64) -> Result<bool>;

    /// 采购单
    async fn create_purchase_order(
        &self,
        created_by: i64,
        req: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrder>;
    async fn get_purchase_order_by_id(&self, id: i64) -> Result<Option<PurchaseOrder>>;
    async fn list_purchase_orders_with_pagination(
        &self,
        query: PurchaseOrderListParams,
    ) -> Result<PurchaseOrderListResponse>;
    async fn update_purchase_order(
        &self,
        id: i64,
        update: UpdatePurchaseOrderRequest,
    ) -> Result<Option<PurchaseOrder>>;
    async fn delete_purchase_order(&self, id: i64) -> Result<bool>;

    /// 附件
    async fn create_attachment(&self, attachment: Attachment) -> Result<Attachment>;
    async fn get_attachment_by_token(&self, token: &str) -> Result<Option<Attachment>>;
    async fn list_attachments(
        &self,
        entity_type: NoteEntityType,
        entity_id: i64,
    ) -> Result<Vec<Attachment>>;

    /// 全局搜索。`order_digits` 为从搜索词中识别出的订单号数字
    async fn search(
        &self,
        term: &str,
        order_digits: &[String],
        limit: u64,
    ) -> Result<SearchResponse>;

    /// 同步状态
    async fn get_sync_state(&self, key: &str) -> Result<Option<SyncState>>;
    async fn save_sync_state(&self, state: &SyncState) -> Result<SyncState>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
