use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CaseService;
use crate::models::{ApiResponse, ErrorCode, cases::requests::CreateCaseRequest};
use crate::services::{check_references, storage_failure};

pub async fn create_case(
    service: &CaseService,
    request: &HttpRequest,
    mut case_data: CreateCaseRequest,
) -> ActixResult<HttpResponse> {
    case_data.title = case_data.title.trim().to_string();
    if case_data.title.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Case title is required",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) = check_references(
        storage.as_ref(),
        case_data.order_id,
        case_data.customer_id,
        case_data.assigned_to,
    )
    .await
    {
        return Ok(resp);
    }

    match storage.create_case(case_data).await {
        Ok(case) => {
            info!("Created case {}", case.case_number);
            Ok(HttpResponse::Created().json(ApiResponse::success(case, "Case created")))
        }
        Err(e) => Ok(storage_failure("Create case", &e)),
    }
}
