use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EmailThreadService, inbox};
use crate::models::email_threads::requests::IngestEmailRequest;
use crate::models::email_threads::responses::IngestEmailResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{mail_extractor, storage_failure};
use crate::utils::validate::validate_email;

pub async fn ingest_message(
    service: &EmailThreadService,
    request: &HttpRequest,
    mut message: IngestEmailRequest,
) -> ActixResult<HttpResponse> {
    message.message_id = message.message_id.trim().to_string();
    message.from_email = message.from_email.trim().to_lowercase();
    message.to_emails = message
        .to_emails
        .iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    if message.message_id.is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::EmailMessageInvalid,
            "Message-ID is required",
        ));
    }
    if validate_email(&message.from_email).is_err() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::EmailMessageInvalid,
            "Sender address is invalid",
        ));
    }

    let storage = service.get_storage(request)?;

    match inbox::ingest_message(storage.as_ref(), mail_extractor(), message).await {
        Ok(outcome) => {
            let (status, msg) = if outcome.duplicate {
                (actix_web::http::StatusCode::OK, "Message already stored")
            } else {
                (actix_web::http::StatusCode::CREATED, "Message stored")
            };
            Ok(HttpResponse::build(status).json(ApiResponse::success(
                IngestEmailResponse {
                    thread: outcome.thread,
                    message: outcome.message,
                    duplicate: outcome.duplicate,
                    created_thread: outcome.created_thread,
                    link_reasons: outcome.link_reasons,
                },
                msg,
            )))
        }
        Err(e) => Ok(storage_failure("Ingest email", &e)),
    }
}
