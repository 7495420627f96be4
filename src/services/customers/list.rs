use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CustomerService;
use crate::models::{ApiResponse, customers::requests::CustomerListParams};
use crate::services::storage_failure;

pub async fn list_customers(
    service: &CustomerService,
    request: &HttpRequest,
    query: CustomerListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_customers_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Customer list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List customers", &e)),
    }
}
