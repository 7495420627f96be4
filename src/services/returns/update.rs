use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReturnService;
use crate::models::{ApiResponse, ErrorCode, returns::requests::UpdateReturnRequest};
use crate::services::{check_references, storage_failure};

pub async fn update_return(
    service: &ReturnService,
    request: &HttpRequest,
    return_id: i64,
    update_data: UpdateReturnRequest,
) -> ActixResult<HttpResponse> {
    if update_data.refund_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Refund amount cannot be negative",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        update_data.order_id,
        update_data.customer_id,
        None,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.update_return(return_id, update_data).await {
        Ok(Some(ret)) => Ok(HttpResponse::Ok().json(ApiResponse::success(ret, "Return updated"))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::ReturnNotFound, "Return not found")),
        Err(e) => Ok(storage_failure("Update return", &e)),
    }
}
