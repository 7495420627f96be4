use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::{EmailThreadService, load_thread};
use crate::config::{AppConfig, MailConfig};
use crate::errors::ThriftHubError;
use crate::models::email_threads::entities::{EmailMessage, EmailThread, MessageDirection};
use crate::models::email_threads::requests::{IngestEmailRequest, ReplyThreadRequest};
use crate::models::email_threads::responses::IngestEmailResponse;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

/// 最多保留的 References 数量
const MAX_REFERENCES: usize = 20;

/// 构造一封出站回复。只记录，不负责投递
fn build_reply(
    thread: &EmailThread,
    last: Option<&EmailMessage>,
    reply: ReplyThreadRequest,
    sender: &User,
    mail: &MailConfig,
) -> IngestEmailRequest {
    let from_email = mail
        .own_addresses
        .first()
        .cloned()
        .unwrap_or_else(|| format!("support@{}", mail.message_id_host));

    let mut references: Vec<String> = last.map(|m| m.references.clone()).unwrap_or_default();
    if let Some(last) = last {
        references.push(last.message_id.clone());
    }
    if references.len() > MAX_REFERENCES {
        references.drain(..references.len() - MAX_REFERENCES);
    }

    let subject = if thread.subject.to_lowercase().starts_with("re:") {
        thread.subject.clone()
    } else {
        format!("Re: {}", thread.subject)
    };

    IngestEmailRequest {
        message_id: format!("<{}@{}>", uuid::Uuid::new_v4(), mail.message_id_host),
        in_reply_to: last.map(|m| m.message_id.clone()),
        references,
        direction: MessageDirection::Outbound,
        from_email,
        from_name: sender
            .display_name
            .clone()
            .or_else(|| Some(sender.username.clone())),
        to_emails: vec![thread.participant_email.clone()],
        subject,
        body_text: Some(reply.body_text),
        body_html: reply.body_html,
        sent_at: Some(Utc::now()),
    }
}

pub async fn reply_to_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
    reply_data: ReplyThreadRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;

    if reply_data.body_text.trim().is_empty() {
        return Ok(ApiResponse::bad_request(
            ErrorCode::EmailMessageInvalid,
            "Reply body is required",
        ));
    }

    let storage = service.get_storage(request)?;
    let thread = match load_thread(storage.as_ref(), thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };

    let messages = match storage.list_thread_messages(thread_id).await {
        Ok(messages) => messages,
        Err(e) => return Ok(storage_failure("List thread messages", &e)),
    };

    let outgoing = build_reply(
        &thread,
        messages.last(),
        reply_data,
        &user,
        &AppConfig::get().mail,
    );
    let sent_at = outgoing.sent_at.unwrap_or_else(Utc::now);

    let (message, thread) = match storage.append_message(thread_id, &outgoing, sent_at).await {
        Ok(appended) => appended,
        Err(ThriftHubError::NotFound(_)) => {
            return Ok(ApiResponse::not_found(
                ErrorCode::EmailThreadNotFound,
                "Email thread not found",
            ));
        }
        Err(e) => return Ok(storage_failure("Store reply", &e)),
    };

    info!(
        "{} replied to thread {} ({})",
        user.username, thread_id, message.message_id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        IngestEmailResponse {
            thread,
            message,
            duplicate: false,
            created_thread: false,
            link_reasons: Vec::new(),
        },
        "Reply recorded",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::email_threads::entities::ThreadStatus;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn thread(subject: &str) -> EmailThread {
        let now = Utc::now();
        EmailThread {
            id: 1,
            subject: subject.into(),
            normalized_subject: subject.to_lowercase(),
            participant_email: "anna@example.nl".into(),
            participant_name: None,
            status: ThreadStatus::Open,
            is_read: true,
            assigned_to: None,
            customer_id: None,
            order_id: None,
            case_id: None,
            repair_id: None,
            return_id: None,
            message_count: 1,
            last_message_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn last_message() -> EmailMessage {
        let now = Utc::now();
        EmailMessage {
            id: 5,
            thread_id: 1,
            message_id: "<m2@mail.example.nl>".into(),
            in_reply_to: Some("<m1@mail.example.nl>".into()),
            references: vec!["<m1@mail.example.nl>".into()],
            direction: MessageDirection::Inbound,
            from_email: "anna@example.nl".into(),
            from_name: None,
            to_emails: vec![],
            subject: "Re: Lens".into(),
            body_text: None,
            body_html: None,
            sent_at: now,
            created_at: now,
        }
    }

    fn agent() -> User {
        let now = Utc::now();
        User {
            id: 2,
            username: "sanne".into(),
            email: "sanne@dutchthrift.nl".into(),
            password_hash: String::new(),
            role: UserRole::Agent,
            status: UserStatus::Active,
            display_name: Some("Sanne".into()),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_build_reply_threads_headers() {
        let mail = MailConfig {
            own_addresses: vec!["info@dutchthrift.nl".into()],
            order_prefixes: vec![],
            message_id_host: "dutchthrift.nl".into(),
        };
        let last = last_message();
        let reply = build_reply(
            &thread("Lens"),
            Some(&last),
            ReplyThreadRequest {
                body_text: "We sturen een nieuwe.".into(),
                body_html: None,
            },
            &agent(),
            &mail,
        );

        assert_eq!(reply.direction, MessageDirection::Outbound);
        assert_eq!(reply.in_reply_to.as_deref(), Some("<m2@mail.example.nl>"));
        assert_eq!(
            reply.references,
            vec!["<m1@mail.example.nl>".to_string(), "<m2@mail.example.nl>".to_string()]
        );
        assert_eq!(reply.subject, "Re: Lens");
        assert_eq!(reply.from_email, "info@dutchthrift.nl");
        assert_eq!(reply.to_emails, vec!["anna@example.nl".to_string()]);
        assert!(reply.message_id.starts_with('<'));
        assert!(reply.message_id.ends_with("@dutchthrift.nl>"));
    }

    #[test]
    fn test_build_reply_without_history() {
        let reply = build_reply(
            &thread("Re: Retour"),
            None,
            ReplyThreadRequest {
                body_text: "Ontvangen".into(),
                body_html: None,
            },
            &agent(),
            &MailConfig::default(),
        );
        assert!(reply.in_reply_to.is_none());
        assert!(reply.references.is_empty());
        assert_eq!(reply.subject, "Re: Retour");
        assert_eq!(reply.from_email, "support@thrifthub.local");
    }
}
