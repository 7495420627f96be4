use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CaseService;
use crate::models::{ApiResponse, ErrorCode, cases::requests::UpdateCaseRequest};
use crate::services::{check_references, storage_failure};

pub async fn update_case(
    service: &CaseService,
    request: &HttpRequest,
    case_id: i64,
    update_data: UpdateCaseRequest,
) -> ActixResult<HttpResponse> {
    if update_data.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Case title cannot be empty",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        update_data.order_id,
        update_data.customer_id,
        update_data.assigned_to,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.update_case(case_id, update_data).await {
        Ok(Some(case)) => Ok(HttpResponse::Ok().json(ApiResponse::success(case, "Case updated"))),
        Ok(None) => Ok(ApiResponse::not_found(ErrorCode::CaseNotFound, "Case not found")),
        Err(e) => Ok(storage_failure("Update case", &e)),
    }
}
