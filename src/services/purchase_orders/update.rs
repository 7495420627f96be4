use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PurchaseOrderService, validate_items};
use crate::models::{
    ApiResponse, ErrorCode, purchase_orders::requests::UpdatePurchaseOrderRequest,
};
use crate::services::storage_failure;

pub async fn update_purchase_order(
    service: &PurchaseOrderService,
    request: &HttpRequest,
    po_id: i64,
    update_data: UpdatePurchaseOrderRequest,
) -> ActixResult<HttpResponse> {
    if update_data
        .supplier_name
        .as_deref()
        .is_some_and(|s| s.trim().is_empty())
    {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Supplier name cannot be empty",
        ));
    }
    if update_data.total_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Total cannot be negative",
        ));
    }
    if let Some(items) = update_data.items.as_deref()
        && let Err(msg) = validate_items(items)
    {
        return Ok(ApiResponse::bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.update_purchase_order(po_id, update_data).await {
        Ok(Some(po)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            po,
            "Purchase order updated",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(
            ErrorCode::PurchaseOrderNotFound,
            "Purchase order not found",
        )),
        Err(e) => Ok(storage_failure("Update purchase order", &e)),
    }
}
