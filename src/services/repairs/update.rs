use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RepairService;
use crate::models::{ApiResponse, ErrorCode, repairs::requests::UpdateRepairRequest};
use crate::services::{check_references, storage_failure};

pub async fn update_repair(
    service: &RepairService,
    request: &HttpRequest,
    repair_id: i64,
    update_data: UpdateRepairRequest,
) -> ActixResult<HttpResponse> {
    if update_data
        .product_name
        .as_deref()
        .is_some_and(|s| s.trim().is_empty())
        || update_data
            .issue_description
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
    {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Product name and issue description cannot be empty",
        ));
    }
    if update_data.cost_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Repair cost cannot be negative",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        update_data.order_id,
        update_data.customer_id,
        update_data.assigned_to,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.update_repair(repair_id, update_data).await {
        Ok(Some(repair)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(repair, "Repair updated")))
        }
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::RepairNotFound, "Repair not found")),
        Err(e) => Ok(storage_failure("Update repair", &e)),
    }
}
