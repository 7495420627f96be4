use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::OrderService;
use crate::models::{ApiResponse, orders::requests::OrderListParams};
use crate::services::storage_failure;

pub async fn list_orders(
    service: &OrderService,
    request: &HttpRequest,
    query: OrderListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_orders_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Order list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List orders", &e)),
    }
}
