use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SyncService, is_running};
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::sync::{SHOPIFY_ORDERS_KEY, SyncState, SyncStatusResponse};
use crate::services::storage_failure;

pub async fn sync_status(service: &SyncService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let state = match storage.get_sync_state(SHOPIFY_ORDERS_KEY).await {
        Ok(state) => state.unwrap_or_else(|| SyncState::idle(SHOPIFY_ORDERS_KEY)),
        Err(e) => return Ok(storage_failure("Get sync state", &e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SyncStatusResponse {
            state,
            configured: AppConfig::get().shopify.is_configured(),
            running: is_running(),
        },
        "Sync status retrieved",
    )))
}
