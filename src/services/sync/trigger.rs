use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{SyncService, run_sync};
use crate::config::AppConfig;
use crate::errors::ThriftHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::current_user;

/// 手动触发一轮同步并等待结果
pub async fn trigger_sync(service: &SyncService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    if !AppConfig::get().shopify.is_configured() {
        return Ok(ApiResponse::respond(
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::SyncNotConfigured,
            "Shopify is not configured",
        ));
    }

    let storage = service.get_storage(request)?;
    info!("Shopify sync triggered by {}", user.username);

    match run_sync(storage).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "Sync completed"))),
        Err(ThriftHubError::Conflict(_)) => Ok(ApiResponse::respond(
            StatusCode::CONFLICT,
            ErrorCode::SyncAlreadyRunning,
            "A sync is already running",
        )),
        Err(e) => Ok(ApiResponse::respond(
            StatusCode::BAD_GATEWAY,
            ErrorCode::SyncFailed,
            format!("Sync failed: {}", e.message()),
        )),
    }
}
