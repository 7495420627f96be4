use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CustomerService;
use crate::models::customers::responses::CustomerDetailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_customer(
    service: &CustomerService,
    request: &HttpRequest,
    customer_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let customer = match storage.get_customer_by_id(customer_id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            return Ok(ApiResponse::not_found(
                ErrorCode::CustomerNotFound,
                "Customer not found",
            ));
        }
        Err(e) => return Ok(storage_failure("Get customer", &e)),
    };

    let orders = match storage.list_orders_by_customer(customer_id).await {
        Ok(orders) => orders,
        Err(e) => return Ok(storage_failure("List customer orders", &e)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CustomerDetailResponse { customer, orders },
        "Customer retrieved successfully",
    )))
}
