use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RepairService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_repair(
    service: &RepairService,
    request: &HttpRequest,
    repair_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_repair_by_id(repair_id).await {
        Ok(Some(repair)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            repair,
            "Repair retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::RepairNotFound, "Repair not found")),
        Err(e) => Ok(storage_failure("Get repair", &e)),
    }
}
