use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::OrderService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_order(
    service: &OrderService,
    request: &HttpRequest,
    order_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_order(order_id).await {
        Ok(true) => {
            info!("Order {} soft-deleted", order_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Order deleted")))
        }
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::OrderNotFound, "Order not found")),
        Err(e) => Ok(storage_failure("Delete order", &e)),
    }
}
