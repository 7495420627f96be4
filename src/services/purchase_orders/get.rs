use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PurchaseOrderService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_purchase_order(
    service: &PurchaseOrderService,
    request: &HttpRequest,
    po_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_purchase_order_by_id(po_id).await {
        Ok(Some(po)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            po,
            "Purchase order retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(
            ErrorCode::PurchaseOrderNotFound,
            "Purchase order not found",
        )),
        Err(e) => Ok(storage_failure("Get purchase order", &e)),
    }
}
