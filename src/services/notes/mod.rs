pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notes::requests::{CreateNoteRequest, NoteListParams};
use crate::storage::Storage;

/// 挂在任意业务记录上的内部备注
pub struct NoteService {
    storage: Option<Arc<dyn Storage>>,
}

impl NoteService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_notes(
        &self,
        request: &HttpRequest,
        query: NoteListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_notes(self, request, query).await
    }

    pub async fn create_note(
        &self,
        request: &HttpRequest,
        note_data: CreateNoteRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_note(self, request, note_data).await
    }

    // 作者本人或管理员
    pub async fn delete_note(&self, request: &HttpRequest, note_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_note(self, request, note_id).await
    }
}
