use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrderService;
use crate::models::orders::responses::OrderDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_order(
    service: &OrderService,
    request: &HttpRequest,
    order_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let order = match storage.get_order_by_id(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => return Ok(ApiResponse::not_found(ErrorCode::OrderNotFound, "Order not found")),
        Err(e) => return Ok(storage_failure("Get order", &e)),
    };

    let (returns, repairs, email_threads) = match tokio::try_join!(
        storage.list_returns_by_order(order_id),
        storage.list_repairs_by_order(order_id),
        storage.list_threads_by_order(order_id),
    ) {
        Ok(related) => related,
        Err(e) => return Ok(storage_failure("Load order relations", &e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        OrderDetailResponse {
            order,
            returns,
            repairs,
            email_threads,
        },
        "Order retrieved successfully",
    )))
}
