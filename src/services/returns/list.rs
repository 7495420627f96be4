use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReturnService;
use crate::models::{ApiResponse, returns::requests::ReturnListParams};
use crate::services::storage_failure;

pub async fn list_returns(
    service: &ReturnService,
    request: &HttpRequest,
    query: ReturnListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_returns_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Return list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List returns", &e)),
    }
}
