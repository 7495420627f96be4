use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FileService;
use crate::models::ApiResponse;
use crate::models::files::requests::AttachmentListParams;
use crate::models::files::responses::AttachmentListResponse;
use crate::services::storage_failure;

pub async fn list_attachments(
    service: &FileService,
    request: &HttpRequest,
    query: AttachmentListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage
        .list_attachments(query.entity_type, query.entity_id)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttachmentListResponse { items },
            "Attachments retrieved",
        ))),
        Err(e) => Ok(storage_failure("List attachments", &e)),
    }
}
