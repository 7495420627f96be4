use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoteService;
use crate::models::notes::{requests::NoteListParams, responses::NoteListResponse};
use crate::models::ApiResponse;
use crate::services::storage_failure;

pub async fn list_notes(
    service: &NoteService,
    request: &HttpRequest,
    query: NoteListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_notes(query.entity_type, query.entity_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            NoteListResponse { items },
            "Notes retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List notes", &e)),
    }
}
