use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CaseService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;

pub async fn get_case(
    service: &CaseService,
    request: &HttpRequest,
    case_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_case_by_id(case_id).await {
        Ok(Some(case)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            case,
            "Case retrieved successfully",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::CaseNotFound, "Case not found")),
        Err(e) => Ok(storage_failure("Get case", &e)),
    }
}
