use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RepairService;
use crate::models::{ApiResponse, repairs::requests::RepairListParams};
use crate::services::storage_failure;

pub async fn list_repairs(
    service: &RepairService,
    request: &HttpRequest,
    query: RepairListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_repairs_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Repair list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List repairs", &e)),
    }
}
