use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RepairService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_repair(
    service: &RepairService,
    request: &HttpRequest,
    repair_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_repair(repair_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Repair deleted"))),
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::RepairNotFound, "Repair not found")),
        Err(e) => Ok(storage_failure("Delete repair", &e)),
    }
}
