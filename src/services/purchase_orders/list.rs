use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PurchaseOrderService;
use crate::models::{ApiResponse, purchase_orders::requests::PurchaseOrderListParams};
use crate::services::storage_failure;

pub async fn list_purchase_orders(
    service: &PurchaseOrderService,
    request: &HttpRequest,
    query: PurchaseOrderListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_purchase_orders_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Purchase order list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List purchase orders", &e)),
    }
}
