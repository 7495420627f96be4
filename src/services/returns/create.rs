use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ReturnService;
use crate::models::{ApiResponse, ErrorCode, returns::requests::CreateReturnRequest};
use crate::services::{check_references, storage_failure};

pub async fn create_return(
    service: &ReturnService,
    request: &HttpRequest,
    return_data: CreateReturnRequest,
) -> ActixResult<HttpResponse> {
    if return_data.refund_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Refund amount cannot be negative",
        ));
    }
    if return_data.items.iter().any(|item| item.quantity <= 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Return item quantity must be positive",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        return_data.order_id,
        return_data.customer_id,
        None,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.create_return(return_data).await {
        Ok(ret) => {
            info!("Created return {}", ret.return_number);
            Ok(HttpResponse::Created().json(ApiResponse::success(ret, "Return created")))
        }
        Err(e) => Ok(storage_failure("Create return", &e)),
    }
}
