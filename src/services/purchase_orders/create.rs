use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{PurchaseOrderService, validate_items};
use crate::models::{
    ApiResponse, ErrorCode, purchase_orders::requests::CreatePurchaseOrderRequest,
};
use crate::services::{current_user, storage_failure};

pub async fn create_purchase_order(
    service: &PurchaseOrderService,
    request: &HttpRequest,
    mut po_data: CreatePurchaseOrderRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    po_data.supplier_name = po_data.supplier_name.trim().to_string();
    if po_data.supplier_name.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Supplier name is required",
        ));
    }
    if po_data.total_cents.is_some_and(|c| c < 0) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Total cannot be negative",
        ));
    }
    if let Err(msg) = validate_items(&po_data.items) {
        return Ok(ApiResponse::bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request)?;
    match storage.create_purchase_order(user.id, po_data).await {
        Ok(po) => {
            info!("Created purchase order {} by {}", po.po_number, user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(po, "Purchase order created")))
        }
        Err(e) => Ok(storage_failure("Create purchase order", &e)),
    }
}
