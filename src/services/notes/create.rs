use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoteService;
use crate::models::{ApiResponse, ErrorCode, notes::requests::CreateNoteRequest};
use crate::services::{check_entity_exists, current_user, storage_failure};

const MAX_NOTE_LENGTH: usize = 10_000;

pub async fn create_note(
    service: &NoteService,
    request: &HttpRequest,
    mut note_data: CreateNoteRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    note_data.content = note_data.content.trim().to_string();
    if note_data.content.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Note content is required",
        ));
    }
    if note_data.content.chars().count() > MAX_NOTE_LENGTH {
        return Ok(ApiResponse::bad_request(
            ErrorCode::BadRequest,
            "Note content is too long",
        ));
    }

    let storage = service.get_storage(request)?;
    if let Err(resp) =
        check_entity_exists(storage.as_ref(), note_data.entity_type, note_data.entity_id).await
    {
        return Ok(resp);
    }

    match storage.create_note(user.id, note_data).await {
        Ok(note) => Ok(HttpResponse::Created().json(ApiResponse::success(note, "Note created"))),
        Err(e) => Ok(storage_failure("Create note", &e)),
    }
}
