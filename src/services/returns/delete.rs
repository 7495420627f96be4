use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReturnService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_return(
    service: &ReturnService,
    request: &HttpRequest,
    return_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_return(return_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Return deleted"))),
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::ReturnNotFound, "Return not found")),
        Err(e) => Ok(storage_failure("Delete return", &e)),
    }
}
