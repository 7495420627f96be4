use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EmailThreadService, load_thread};
use crate::mail::split_message;
use crate::models::ApiResponse;
use crate::models::email_threads::responses::{EmailMessageView, ThreadDetailResponse};
use crate::services::storage_failure;

pub async fn get_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let thread = match load_thread(storage.as_ref(), thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };

    let messages = match storage.list_thread_messages(thread_id).await {
        Ok(messages) => messages,
        Err(e) => return Ok(storage_failure("List thread messages", &e)),
    };

    let messages = messages
        .into_iter()
        .map(|message| {
            let split = split_message(message.body_text.as_deref(), message.body_html.as_deref());
            EmailMessageView { message, split }
        })
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ThreadDetailResponse { thread, messages },
        "Email thread retrieved successfully",
    )))
}
