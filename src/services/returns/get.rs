use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReturnService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_return(
    service: &ReturnService,
    request: &HttpRequest,
    return_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_return_by_id(return_id).await {
        Ok(Some(ret)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ret,
            "Return retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::ReturnNotFound, "Return not found")),
        Err(e) => Ok(storage_failure("Get return", &e)),
    }
}
