use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use super::{CustomerService, normalize_optional_email};
use crate::models::{ApiResponse, ErrorCode, customers::requests::UpdateCustomerRequest};
use crate::services::storage_failure;

pub async fn update_customer(
    service: &CustomerService,
    request: &HttpRequest,
    customer_id: i64,
    mut update_data: UpdateCustomerRequest,
) -> ActixResult<HttpResponse> {
    update_data.email = match normalize_optional_email(update_data.email.take()) {
        Ok(email) => email,
        Err(msg) => return Ok(ApiResponse::bad_request(ErrorCode::BadRequest, msg)),
    };

    let storage = service.get_storage(request)?;

    if let Some(email) = update_data.email.as_deref() {
        match storage.get_customer_by_email(email).await {
            Ok(Some(other)) if other.id != customer_id => {
                return Ok(ApiResponse::respond(
                    StatusCode::CONFLICT,
                    ErrorCode::Conflict,
                    "A customer with this email already exists",
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_failure("Customer lookup", &e)),
        }
    }

    match storage.update_customer(customer_id, update_data).await {
        Ok(Some(customer)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(customer, "Customer updated")))
        }
        Ok(None) => Ok(ApiResponse::not_found(
            ErrorCode::CustomerNotFound,
            "Customer not found",
        )),
        Err(e) => Ok(storage_failure("Update customer", &e)),
    }
}
