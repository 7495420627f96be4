pub mod analyze;
pub mod delete;
pub mod get;
pub mod inbox;
pub mod ingest;
pub mod link;
pub mod list;
pub mod reply;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::email_threads::entities::EmailThread;
use crate::models::email_threads::requests::{
    IngestEmailRequest, LinkThreadRequest, ReplyThreadRequest, ThreadListParams,
    UpdateThreadRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_failure;
use crate::storage::Storage;

/// 收件箱
pub struct EmailThreadService {
    storage: Option<Arc<dyn Storage>>,
}

impl EmailThreadService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_threads(
        &self,
        request: &HttpRequest,
        query: ThreadListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_threads(self, request, query).await
    }

    // 会话详情，邮件按时间正序并带拆分结果
    pub async fn get_thread(&self, request: &HttpRequest, thread_id: i64) -> ActixResult<HttpResponse> {
        get::get_thread(self, request, thread_id).await
    }

    pub async fn ingest_message(
        &self,
        request: &HttpRequest,
        message: IngestEmailRequest,
    ) -> ActixResult<HttpResponse> {
        ingest::ingest_message(self, request, message).await
    }

    pub async fn update_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
        update_data: UpdateThreadRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_thread(self, request, thread_id, update_data).await
    }

    pub async fn link_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
        link_data: LinkThreadRequest,
    ) -> ActixResult<HttpResponse> {
        link::link_thread(self, request, thread_id, link_data).await
    }

    pub async fn auto_link_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
    ) -> ActixResult<HttpResponse> {
        analyze::auto_link_thread(self, request, thread_id).await
    }

    pub async fn extract_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
    ) -> ActixResult<HttpResponse> {
        analyze::extract_thread(self, request, thread_id).await
    }

    pub async fn reply_to_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
        reply_data: ReplyThreadRequest,
    ) -> ActixResult<HttpResponse> {
        reply::reply_to_thread(self, request, thread_id, reply_data).await
    }

    pub async fn delete_thread(
        &self,
        request: &HttpRequest,
        thread_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_thread(self, request, thread_id).await
    }
}

pub(crate) async fn load_thread(
    storage: &dyn Storage,
    thread_id: i64,
) -> Result<EmailThread, HttpResponse> {
    match storage.get_thread_by_id(thread_id).await {
        Ok(Some(thread)) => Ok(thread),
        Ok(None) => Err(ApiResponse::not_found(
            ErrorCode::EmailThreadNotFound,
            "Email thread not found",
        )),
        Err(e) => Err(storage_failure("Get email thread", &e)),
    }
}
