//! API 路由层
//!
//! 每个资源一个 scope，统一挂 `RequireJWT`；写操作按路由再挂角色校验。

pub mod auth;
pub mod cases;
pub mod customers;
pub mod email_threads;
pub mod files;
pub mod frontend;
pub mod notes;
pub mod orders;
pub mod purchase_orders;
pub mod repairs;
pub mod returns;
pub mod search;
pub mod sync;
pub mod todos;
pub mod users;

pub use auth::configure_auth_routes;
pub use cases::configure_cases_routes;
pub use customers::configure_customer_routes;
pub use email_threads::configure_email_thread_routes;
pub use files::configure_file_routes;
pub use frontend::configure_frontend_routes;
pub use notes::configure_note_routes;
pub use orders::configure_order_routes;
pub use purchase_orders::configure_purchase_orders_routes;
pub use repairs::configure_repairs_routes;
pub use returns::configure_returns_routes;
pub use search::configure_search_routes;
pub use sync::configure_sync_routes;
pub use todos::configure_todos_routes;
pub use users::configure_user_routes;

use actix_web::web;

use crate::middlewares::RequireRole;
use crate::models::users::entities::UserRole;

/// 管理员和客服可写
pub(crate) fn staff_only() -> RequireRole {
    RequireRole::new_any(UserRole::staff_roles())
}

pub(crate) fn admin_only() -> RequireRole {
    RequireRole::new_any(UserRole::admin_roles())
}

/// 注册全部 API 路由，前端 fallback 最后注册
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_customer_routes)
        .configure(configure_order_routes)
        .configure(configure_returns_routes)
        .configure(configure_repairs_routes)
        .configure(configure_todos_routes)
        .configure(configure_cases_routes)
        .configure(configure_note_routes)
        .configure(configure_email_thread_routes)
        .configure(configure_purchase_orders_routes)
        .configure(configure_file_routes)
        .configure(configure_search_routes)
        .configure(configure_sync_routes)
        .configure(configure_frontend_routes);
}
