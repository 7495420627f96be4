use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::RepairService;
use crate::models::{ApiResponse, ErrorCode, repairs::requests::CreateRepairRequest};
use crate::services::{check_references, storage_failure};

pub async fn create_repair(
    service: &RepairService,
    request: &HttpRequest,
    mut repair_data: CreateRepairRequest,
) -> ActixResult<HttpResponse> {
    repair_data.product_name = repair_data.product_name.trim().to_string();
    repair_data.issue_description = repair_data.issue_description.trim().to_string();

    if repair_data.product_name.is_empty() || repair_data.issue_description.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Product name and issue description are required",
        ));
    }
    if repair_data.cost_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Repair cost cannot be negative",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        repair_data.order_id,
        repair_data.customer_id,
        repair_data.assigned_to,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.create_repair(repair_data).await {
        Ok(repair) => {
            info!("Created repair {}", repair.repair_number);
            Ok(HttpResponse::Created().json(ApiResponse::success(repair, "Repair created")))
        }
        Err(e) => Ok(storage_failure("Create repair", &e)),
    }
}
