use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::notes::requests::{CreateNoteRequest, NoteListParams};
use crate::services::NoteService;
use crate::utils::SafeIDI64;

static NOTE_SERVICE: Lazy<NoteService> = Lazy::new(NoteService::new_lazy);

pub async fn list_notes(
    req: HttpRequest,
    query: web::Query<NoteListParams>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.list_notes(&req, query.into_inner()).await
}

pub async fn create_note(
    req: HttpRequest,
    note_data: web::Json<CreateNoteRequest>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.create_note(&req, note_data.into_inner()).await
}

pub async fn delete_note(req: HttpRequest, note_id: SafeIDI64) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.delete_note(&req, note_id.0).await
}

pub fn configure_note_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_notes))
                    .route(web::post().to(create_note).wrap(staff_only())),
            )
            // 作者本人或管理员才能删除，由服务层判断
            .service(
                web::resource("/{id}").route(web::delete().to(delete_note).wrap(staff_only())),
            ),
    );
}
