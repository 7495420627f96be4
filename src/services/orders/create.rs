use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::OrderService;
use crate::models::{ApiResponse, ErrorCode, orders::requests::CreateOrderRequest};
use crate::services::{check_references, storage_failure};

pub async fn create_order(
    service: &OrderService,
    request: &HttpRequest,
    mut order_data: CreateOrderRequest,
) -> ActixResult<HttpResponse> {
    order_data.order_number = order_data.order_number.trim().to_string();
    if order_data.order_number.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Order number is required",
        ));
    }
    if order_data.total_cents < 0 {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Order total cannot be negative",
        ));
    }
    order_data.customer_email = order_data
        .customer_email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    let storage = service.get_storage(request)?;

    // 订单号唯一（包括已删除的订单）
    match storage.get_order_by_number(&order_data.order_number).await {
        Ok(Some(_)) => {
            return Ok(ApiResponse::respond(
                StatusCode::CONFLICT,
                ErrorCode::Conflict,
                "Order number already exists",
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_failure("Order lookup", &e)),
    }

    if let Err(resp) =
        check_references(storage.as_ref(), None, order_data.customer_id, None).await
    {
        return Ok(resp);
    }

    match storage.create_order(order_data).await {
        Ok(order) => {
            info!("Created order {}", order.order_number);
            Ok(HttpResponse::Created().json(ApiResponse::success(order, "Order created")))
        }
        Err(e) => Ok(storage_failure("Create order", &e)),
    }
}
