use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CaseService;
use crate::models::{ApiResponse, cases::requests::CaseListParams};
use crate::services::storage_failure;

pub async fn list_cases(
    service: &CaseService,
    request: &HttpRequest,
    query: CaseListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_cases_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Case list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List cases", &e)),
    }
}
