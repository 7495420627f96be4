use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use tracing::info;

use super::{CustomerService, normalize_optional_email};
use crate::models::{ApiResponse, ErrorCode, customers::requests::CreateCustomerRequest};
use crate::services::storage_failure;

pub async fn create_customer(
    service: &CustomerService,
    request: &HttpRequest,
    mut customer_data: CreateCustomerRequest,
) -> ActixResult<HttpResponse> {
    customer_data.email = match normalize_optional_email(customer_data.email.take()) {
        Ok(email) => email,
        Err(msg) => return Ok(ApiResponse::bad_request(ErrorCode::BadRequest, msg)),
    };

    let storage = service.get_storage(request)?;

    // 同一邮箱只保留一个客户
    if let Some(email) = customer_data.email.as_deref() {
        match storage.get_customer_by_email(email).await {
            Ok(Some(_)) => {
                return Ok(ApiResponse::respond(
                    StatusCode::CONFLICT,
                    ErrorCode::Conflict,
                    "A customer with this email already exists",
                ));
            }
            Ok(None) => {}
            Err(e) => return Ok(storage_failure("Customer lookup", &e)),
        }
    }

    match storage.create_customer(customer_data).await {
        Ok(customer) => {
            info!("Created customer {}", customer.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(customer, "Customer created")))
        }
        Err(e) => Ok(storage_failure("Create customer", &e)),
    }
}
