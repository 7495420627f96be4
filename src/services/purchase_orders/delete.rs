use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PurchaseOrderService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_purchase_order(
    service: &PurchaseOrderService,
    request: &HttpRequest,
    po_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_purchase_order(po_id).await {
        Ok(true) => {
            info!("Purchase order {} deleted", po_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Purchase order deleted")))
        }
        Ok(false) => Ok(ApiResponse::not_found(
            ErrorCode::PurchaseOrderNotFound,
            "Purchase order not found",
        )),
        Err(e) => Ok(storage_failure("Delete purchase order", &e)),
    }
}
