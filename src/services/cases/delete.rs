use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CaseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn delete_case(
    service: &CaseService,
    request: &HttpRequest,
    case_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_case(case_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Case deleted"))),
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::CaseNotFound, "Case not found")),
        Err(e) => Ok(storage_failure("Delete case", &e)),
    }
}
