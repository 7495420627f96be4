use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoteService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn delete_note(
    service: &NoteService,
    request: &HttpRequest,
    note_id: i64,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    let storage = service.get_storage(request)?;

    let note = match storage.get_note_by_id(note_id).await {
        Ok(Some(note)) => note,
        Ok(None) => return Ok(ApiResponse::not_found(ErrorCode::NoteNotFound, "Note not found")),
        Err(e) => return Ok(storage_failure("Get note", &e)),
    };

    if note.author_id != user.id && !user.is_admin() {
        return Ok(ApiResponse::forbidden(
            ErrorCode::NotePermissionDenied,
            "Only the author or an admin can delete this note",
        ));
    }

    match storage.delete_note(note_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Note deleted"))),
        Ok(false) => Ok(ApiResponse::not_found(ErrorCode::NoteNotFound, "Note not found")),
        Err(e) => Ok(storage_failure("Delete note", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notes::entities::NoteEntityType;
    use crate::models::notes::requests::CreateNoteRequest;
    use crate::models::users::entities::UserRole;
    use crate::services::testing::{memory_storage, request_as, seed_user};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_only_author_or_admin_deletes_note() {
        let storage = memory_storage().await;
        let author = seed_user(storage.as_ref(), "mark", UserRole::Agent).await;
        let colleague = seed_user(storage.as_ref(), "pim", UserRole::Agent).await;
        let admin = seed_user(storage.as_ref(), "sanne", UserRole::Admin).await;
        let service = NoteService::new_lazy();

        let note_on_order = |content: &str| CreateNoteRequest {
            entity_type: NoteEntityType::Order,
            entity_id: 1,
            content: content.to_string(),
        };
        let first = storage
            .create_note(author.id, note_on_order("Klant belt terug"))
            .await
            .unwrap();
        let second = storage
            .create_note(author.id, note_on_order("Lens heeft schimmel"))
            .await
            .unwrap();

        let resp = service
            .delete_note(&request_as(&storage, &colleague), first.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(storage.get_note_by_id(first.id).await.unwrap().is_some());

        let resp = service
            .delete_note(&request_as(&storage, &author), first.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = service
            .delete_note(&request_as(&storage, &admin), second.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(storage.get_note_by_id(second.id).await.unwrap().is_none());

        let resp = service
            .delete_note(&request_as(&storage, &admin), second.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
