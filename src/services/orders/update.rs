use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrderService;
use crate::models::{ApiResponse, ErrorCode, orders::requests::UpdateOrderRequest};
use crate::services::{check_references, storage_failure};

pub async fn update_order(
    service: &OrderService,
    request: &HttpRequest,
    order_id: i64,
    mut update_data: UpdateOrderRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    if let Err(resp) =
        check_references(storage.as_ref(), None, update_data.customer_id, None).await
    {
        return Ok(resp);
    }
    update_data.customer_email = update_data.customer_email.map(|e| e.trim().to_lowercase());

    match storage.update_order(order_id, update_data).await {
        Ok(Some(order)) => Ok(HttpResponse::Ok().json(ApiResponse::success(order, "Order updated"))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::OrderNotFound, "Order not found")),
        Err(e) => Ok(storage_failure("Update order", &e)),
    }
}
