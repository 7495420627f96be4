//! 业务逻辑层
//!
//! 每个资源一个服务，服务方法一一对应路由处理函数，具体实现按操作拆分到子模块。

pub mod auth;
pub mod cases;
pub mod customers;
pub mod email_threads;
pub mod files;
pub mod notes;
pub mod orders;
pub mod purchase_orders;
pub mod repairs;
pub mod returns;
pub mod search;
pub mod sync;
pub mod todos;
pub mod users;

pub use auth::AuthService;
pub use cases::CaseService;
pub use customers::CustomerService;
pub use email_threads::EmailThreadService;
pub use files::FileService;
pub use notes::NoteService;
pub use orders::OrderService;
pub use purchase_orders::PurchaseOrderService;
pub use repairs::RepairService;
pub use returns::ReturnService;
pub use search::SearchService;
pub use sync::SyncService;
pub use todos::TodoService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, error::InternalError, web};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::AppConfig;
use crate::errors::ThriftHubError;
use crate::mail::Extractor;
use crate::middlewares::RequireJWT;
use crate::models::notes::entities::NoteEntityType;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

static MAIL_EXTRACTOR: Lazy<Extractor> =
    Lazy::new(|| Extractor::from_config(&AppConfig::get().mail));

/// 按配置的订单号前缀和自有邮箱构建的提取器
pub(crate) fn mail_extractor() -> &'static Extractor {
    &MAIL_EXTRACTOR
}

/// 从 app_data 中取出存储
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            InternalError::from_response(
                "storage unavailable",
                ApiResponse::internal_error("Storage unavailable"),
            )
            .into()
        })
}

/// 当前登录用户，路由未挂 RequireJWT 时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> ActixResult<User> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        InternalError::from_response(
            "unauthenticated",
            HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )),
        )
        .into()
    })
}

/// 存储层意外失败：记录日志并返回 500
pub(crate) fn storage_failure(action: &str, err: &ThriftHubError) -> HttpResponse {
    if err.is_client_error() {
        warn!("{} failed: {}", action, err);
    } else {
        error!("{} failed: {}", action, err);
    }
    ApiResponse::internal_error(format!("{action} failed"))
}

fn missing_reference(code: ErrorCode, message: &str) -> HttpResponse {
    ApiResponse::bad_request(code, message)
}

/// 校验请求中引用的订单、客户、用户是否存在，不存在时返回 400
pub(crate) async fn check_references(
    storage: &dyn Storage,
    order_id: Option<i64>,
    customer_id: Option<i64>,
    user_id: Option<i64>,
) -> Result<(), HttpResponse> {
    if let Some(id) = order_id {
        match storage.get_order_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(missing_reference(ErrorCode::OrderNotFound, "Order not found")),
            Err(e) => return Err(storage_failure("Order lookup", &e)),
        }
    }
    if let Some(id) = customer_id {
        match storage.get_customer_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(missing_reference(
                    ErrorCode::CustomerNotFound,
                    "Customer not found",
                ));
            }
            Err(e) => return Err(storage_failure("Customer lookup", &e)),
        }
    }
    if let Some(id) = user_id {
        match storage.get_user_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Err(missing_reference(ErrorCode::UserNotFound, "User not found")),
            Err(e) => return Err(storage_failure("User lookup", &e)),
        }
    }
    Ok(())
}

/// 备注、附件挂载的目标记录需要存在
pub(crate) async fn check_entity_exists(
    storage: &dyn Storage,
    entity_type: NoteEntityType,
    entity_id: i64,
) -> Result<(), HttpResponse> {
    let found = match entity_type {
        NoteEntityType::Order => storage.get_order_by_id(entity_id).await.map(|r| r.is_some()),
        NoteEntityType::Return => storage.get_return_by_id(entity_id).await.map(|r| r.is_some()),
        NoteEntityType::Repair => storage.get_repair_by_id(entity_id).await.map(|r| r.is_some()),
        NoteEntityType::Case => storage.get_case_by_id(entity_id).await.map(|r| r.is_some()),
        NoteEntityType::Customer => storage
            .get_customer_by_id(entity_id)
            .await
            .map(|r| r.is_some()),
        NoteEntityType::EmailThread => storage
            .get_thread_by_id(entity_id)
            .await
            .map(|r| r.is_some()),
        NoteEntityType::PurchaseOrder => storage
            .get_purchase_order_by_id(entity_id)
            .await
            .map(|r| r.is_some()),
    };

    match found {
        Ok(true) => Ok(()),
        Ok(false) => Err(ApiResponse::bad_request(
            ErrorCode::NotFound,
            format!("{entity_type} {entity_id} not found"),
        )),
        Err(e) => Err(storage_failure("Entity lookup", &e)),
    }
}

/// 服务层测试共用：内存存储、预置账号、带登录用户的请求
#[cfg(test)]
pub(crate) mod testing {
    use actix_web::{HttpMessage, HttpRequest, web};
    use std::sync::Arc;

    use crate::models::users::entities::{User, UserRole};
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    pub async fn memory_storage() -> Arc<dyn Storage> {
        Arc::new(SeaOrmStorage::in_memory().await)
    }

    pub async fn seed_user(storage: &dyn Storage, username: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@dutchthrift.nl"),
                password: "not-a-real-hash".into(),
                role,
                display_name: None,
            })
            .await
            .unwrap()
    }

    /// 模拟 RequireJWT 通过后的请求
    pub fn request_as(storage: &Arc<dyn Storage>, user: &User) -> HttpRequest {
        let request = actix_web::test::TestRequest::default()
            .app_data(web::Data::new(storage.clone()))
            .to_http_request();
        request.extensions_mut().insert(user.clone());
        request
    }
}
