use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::admin_only;
use crate::middlewares;
use crate::services::SyncService;

static SYNC_SERVICE: Lazy<SyncService> = Lazy::new(SyncService::new_lazy);

pub async fn trigger_shopify_sync(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYNC_SERVICE.trigger_sync(&req).await
}

pub async fn sync_status(req: HttpRequest) -> ActixResult<HttpResponse> {
    SYNC_SERVICE.sync_status(&req).await
}

// 配置路由
pub fn configure_sync_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/sync")
            .wrap(middlewares::RequireJWT)
            .route("/status", web::get().to(sync_status))
            .route(
                "/shopify",
                web::post()
                    .to(trigger_shopify_sync)
                    .wrap(admin_only())
                    .wrap(middlewares::RateLimit::sync_trigger()),
            ),
    );
}
