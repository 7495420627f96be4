//! 收件箱核心流程：收录邮件、定位会话、自动关联
//!
//! 只依赖 `Storage` 和 `Extractor`，HTTP 处理函数和测试共用。

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::errors::{Result, ThriftHubError};
use crate::linking::{self, LinkCandidates, LinkPlan};
use crate::mail::{ExtractedInfo, Extractor, normalize_subject, split_message};
use crate::models::email_threads::entities::{
    EmailMessage, EmailThread, MessageDirection, ThreadStatus,
};
use crate::models::email_threads::requests::{IngestEmailRequest, NewEmailThread};
use crate::storage::Storage;

#[derive(Debug)]
pub struct IngestOutcome {
    pub thread: EmailThread,
    pub message: EmailMessage,
    pub duplicate: bool,
    pub created_thread: bool,
    pub link_reasons: Vec<String>,
}

/// 会话对方：入站取发件人，出站取第一个收件人
fn participant(req: &IngestEmailRequest) -> (String, Option<String>) {
    match req.direction {
        MessageDirection::Inbound => (req.from_email.to_lowercase(), req.from_name.clone()),
        MessageDirection::Outbound => (
            req.to_emails
                .first()
                .unwrap_or(&req.from_email)
                .to_lowercase(),
            None,
        ),
    }
}

/// 收录一封邮件。Message-ID 重复时不写入，直接返回已有的邮件
pub async fn ingest_message(
    storage: &dyn Storage,
    extractor: &Extractor,
    req: IngestEmailRequest,
) -> Result<IngestOutcome> {
    if let Some(outcome) = existing_message(storage, &req.message_id).await? {
        return Ok(outcome);
    }

    let sent_at = req.sent_at.unwrap_or_else(Utc::now);
    let (thread, created_thread) = resolve_thread(storage, &req, sent_at).await?;

    let (message, thread) = match storage.append_message(thread.id, &req, sent_at).await {
        Ok(appended) => appended,
        // 并发收录同一封邮件
        Err(ThriftHubError::Conflict(_)) => {
            return existing_message(storage, &req.message_id)
                .await?
                .ok_or_else(|| ThriftHubError::not_found(req.message_id.clone()));
        }
        Err(e) => return Err(e),
    };

    let (thread, link_reasons) = match auto_link(storage, extractor, &thread).await {
        Ok((linked, plan)) => (linked, plan.reasons),
        Err(e) => {
            warn!("Auto-linking thread {} failed: {}", thread.id, e);
            (thread, Vec::new())
        }
    };

    info!(
        "Ingested {} message {} into thread {}{}",
        req.direction,
        message.message_id,
        thread.id,
        if created_thread { " (new thread)" } else { "" }
    );

    Ok(IngestOutcome {
        thread,
        message,
        duplicate: false,
        created_thread,
        link_reasons,
    })
}

async fn existing_message(storage: &dyn Storage, message_id: &str) -> Result<Option<IngestOutcome>> {
    let Some(message) = storage.get_message_by_message_id(message_id).await? else {
        return Ok(None);
    };
    let thread = storage
        .get_thread_by_id(message.thread_id)
        .await?
        .ok_or_else(|| ThriftHubError::not_found(format!("email thread {}", message.thread_id)))?;

    debug!("Message {} already stored in thread {}", message_id, thread.id);
    Ok(Some(IngestOutcome {
        thread,
        message,
        duplicate: true,
        created_thread: false,
        link_reasons: Vec::new(),
    }))
}

/// 按 In-Reply-To/References、同主题同对方的未关闭会话、新建会话的顺序定位
async fn resolve_thread(
    storage: &dyn Storage,
    req: &IngestEmailRequest,
    sent_at: DateTime<Utc>,
) -> Result<(EmailThread, bool)> {
    let referenced: Vec<String> = req
        .in_reply_to
        .iter()
        .chain(req.references.iter())
        .filter(|id| !id.trim().is_empty())
        .cloned()
        .collect();

    if let Some(thread) = storage.find_thread_by_message_ids(&referenced).await? {
        return Ok((thread, false));
    }

    let normalized_subject = normalize_subject(&req.subject);
    let (participant_email, participant_name) = participant(req);

    // 空主题不参与合并
    if !normalized_subject.is_empty()
        && let Some(thread) = storage
            .find_open_thread_by_subject(&normalized_subject, &participant_email)
            .await?
    {
        return Ok((thread, false));
    }

    let thread = storage
        .create_thread(NewEmailThread {
            subject: req.subject.clone(),
            normalized_subject,
            participant_email,
            participant_name,
            status: ThreadStatus::Open,
            last_message_at: sent_at,
        })
        .await?;
    Ok((thread, true))
}

/// 会话中可供提取的文本：主题加上每封入站邮件的正文（去掉引用和签名）
pub async fn thread_text(storage: &dyn Storage, thread: &EmailThread) -> Result<String> {
    let messages = storage.list_thread_messages(thread.id).await?;
    let mut parts = vec![thread.subject.clone()];
    parts.extend(
        messages
            .iter()
            .filter(|m| m.direction == MessageDirection::Inbound)
            .map(|m| split_message(m.body_text.as_deref(), m.body_html.as_deref()).reply_text)
            .filter(|text| !text.trim().is_empty()),
    );
    Ok(parts.join("\n\n"))
}

pub async fn extract_thread_info(
    storage: &dyn Storage,
    extractor: &Extractor,
    thread: &EmailThread,
) -> Result<ExtractedInfo> {
    let text = thread_text(storage, thread).await?;
    Ok(extractor.extract(&text))
}

/// 查询候选记录并执行 `plan_links`，有变化时写回
pub async fn auto_link(
    storage: &dyn Storage,
    extractor: &Extractor,
    thread: &EmailThread,
) -> Result<(EmailThread, LinkPlan)> {
    let text = thread_text(storage, thread).await?;
    let digits = extractor.extract_order_numbers(&text);

    let mut candidates = LinkCandidates::default();

    if !digits.is_empty() {
        let numbers = linking::order_number_candidates(&digits, extractor.order_prefixes());
        let orders = storage.find_orders_by_numbers(&numbers).await?;
        candidates.orders_by_number = linking::order_by_extraction(orders, &digits);
    }

    candidates.customer = storage
        .get_customer_by_email(&thread.participant_email)
        .await?;
    if let Some(customer) = &candidates.customer {
        candidates.customer_orders = storage.list_orders_by_customer(customer.id).await?;
    }

    // 已关联的订单也要能被找到，用来补全客户、退货、维修
    let current = thread.links();
    if let Some(order_id) = current.order_id
        && !candidates
            .orders_by_number
            .iter()
            .chain(candidates.customer_orders.iter())
            .any(|o| o.id == order_id)
        && let Some(order) = storage.get_order_by_id(order_id).await?
    {
        candidates.customer_orders.push(order);
    }

    let order_ids: BTreeSet<i64> = candidates
        .orders_by_number
        .iter()
        .chain(candidates.customer_orders.iter())
        .map(|o| o.id)
        .collect();
    for order_id in order_ids {
        candidates
            .returns
            .extend(storage.list_returns_by_order(order_id).await?);
        candidates
            .repairs
            .extend(storage.list_repairs_by_order(order_id).await?);
    }

    let plan = linking::plan_links(&current, &candidates);
    if !plan.changed {
        return Ok((thread.clone(), plan));
    }

    let updated = storage
        .set_thread_links(thread.id, &plan.links)
        .await?
        .ok_or_else(|| ThriftHubError::not_found(format!("email thread {}", thread.id)))?;
    info!("Thread {} auto-linked: {}", thread.id, plan.reasons.join("; "));
    Ok((updated, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customers::requests::CreateCustomerRequest;
    use crate::models::orders::requests::CreateOrderRequest;
    use crate::models::returns::entities::ReturnStatus;
    use crate::models::returns::requests::CreateReturnRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use chrono::TimeZone;

    fn extractor() -> Extractor {
        Extractor::new(vec!["DT".into()], vec!["info@dutchthrift.nl".into()])
    }

    fn inbound(message_id: &str, subject: &str, body: &str) -> IngestEmailRequest {
        IngestEmailRequest {
            message_id: message_id.to_string(),
            in_reply_to: None,
            references: vec![],
            direction: MessageDirection::Inbound,
            from_email: "anna@example.nl".into(),
            from_name: Some("Anna de Vries".into()),
            to_emails: vec!["info@dutchthrift.nl".into()],
            subject: subject.to_string(),
            body_text: Some(body.to_string()),
            body_html: None,
            sent_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()),
        }
    }

    fn order(number: &str, customer_id: Option<i64>) -> CreateOrderRequest {
        CreateOrderRequest {
            order_number: number.to_string(),
            customer_id,
            customer_email: Some("anna@example.nl".into()),
            customer_name: Some("Anna de Vries".into()),
            customer_phone: None,
            total_cents: 12900,
            currency: None,
            status: None,
            tracking_numbers: vec![],
            line_items: vec![],
            shipping_address: None,
            ordered_at: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_message_id_is_noop() {
        let storage = SeaOrmStorage::in_memory().await;
        let first = ingest_message(&storage, &extractor(), inbound("<m1@x>", "Hallo", "Vraag"))
            .await
            .unwrap();
        assert!(first.created_thread);
        assert!(!first.duplicate);

        let again = ingest_message(&storage, &extractor(), inbound("<m1@x>", "Hallo", "Vraag"))
            .await
            .unwrap();
        assert!(again.duplicate);
        assert_eq!(again.message.id, first.message.id);
        assert_eq!(again.thread.message_count, 1);
    }

    #[tokio::test]
    async fn test_reply_headers_then_subject_then_new_thread() {
        let storage = SeaOrmStorage::in_memory().await;
        let ex = extractor();
        let first = ingest_message(&storage, &ex, inbound("<a@x>", "Lens kapot", "Help"))
            .await
            .unwrap();

        // In-Reply-To 命中，即使主题不同
        let mut by_header = inbound("<b@x>", "Iets anders", "Nog een vraag");
        by_header.in_reply_to = Some("<a@x>".into());
        let second = ingest_message(&storage, &ex, by_header).await.unwrap();
        assert_eq!(second.thread.id, first.thread.id);

        // 主题归一化后相同，同一对方
        let third = ingest_message(&storage, &ex, inbound("<c@x>", "RE: Fwd: lens KAPOT", "En?"))
            .await
            .unwrap();
        assert_eq!(third.thread.id, first.thread.id);
        assert_eq!(third.thread.message_count, 3);

        // 不同对方，新会话
        let mut other = inbound("<d@x>", "Lens kapot", "Ook kapot");
        other.from_email = "piet@example.nl".into();
        let fourth = ingest_message(&storage, &ex, other).await.unwrap();
        assert!(fourth.created_thread);
        assert_ne!(fourth.thread.id, first.thread.id);
    }

    #[tokio::test]
    async fn test_inbound_reopens_closed_thread_but_subject_match_skips_it() {
        let storage = SeaOrmStorage::in_memory().await;
        let ex = extractor();
        let first = ingest_message(&storage, &ex, inbound("<a@x>", "Retour", "Hoi"))
            .await
            .unwrap();
        storage
            .update_thread(
                first.thread.id,
                crate::models::email_threads::requests::UpdateThreadRequest {
                    status: Some(ThreadStatus::Closed),
                    is_read: Some(true),
                    assigned_to: None,
                },
            )
            .await
            .unwrap();

        // 关闭的会话不按主题合并
        let fresh = ingest_message(&storage, &ex, inbound("<b@x>", "Retour", "Weer"))
            .await
            .unwrap();
        assert_ne!(fresh.thread.id, first.thread.id);

        // 但按回复头命中时重新打开并标为未读
        let mut reply = inbound("<c@x>", "Re: Retour", "Nog iets");
        reply.references = vec!["<a@x>".into()];
        let reopened = ingest_message(&storage, &ex, reply).await.unwrap();
        assert_eq!(reopened.thread.id, first.thread.id);
        assert_eq!(reopened.thread.status, ThreadStatus::Open);
        assert!(!reopened.thread.is_read);
    }

    #[tokio::test]
    async fn test_ingest_auto_links_order_customer_and_return() {
        let storage = SeaOrmStorage::in_memory().await;
        let customer = storage
            .create_customer(CreateCustomerRequest {
                email: Some("anna@example.nl".into()),
                first_name: Some("Anna".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        storage.create_order(order("#1001", Some(customer.id))).await.unwrap();
        let wanted = storage.create_order(order("#1002", Some(customer.id))).await.unwrap();
        let ret = storage
            .create_return(CreateReturnRequest {
                order_id: Some(wanted.id),
                status: Some(ReturnStatus::InTransit),
                ..Default::default()
            })
            .await
            .unwrap();

        let outcome = ingest_message(
            &storage,
            &extractor(),
            inbound("<a@x>", "Retour", "Mijn bestelnummer: 1002, de retour is onderweg."),
        )
        .await
        .unwrap();

        assert_eq!(outcome.thread.order_id, Some(wanted.id));
        assert_eq!(outcome.thread.customer_id, Some(customer.id));
        assert_eq!(outcome.thread.return_id, Some(ret.id));
        assert_eq!(outcome.link_reasons.len(), 3);
    }

    #[tokio::test]
    async fn test_auto_link_keeps_existing_links() {
        let storage = SeaOrmStorage::in_memory().await;
        let ex = extractor();
        let first = storage.create_order(order("#1001", None)).await.unwrap();
        storage.create_order(order("#1002", None)).await.unwrap();

        let outcome = ingest_message(&storage, &ex, inbound("<a@x>", "Order #1001", "Hoi"))
            .await
            .unwrap();
        assert_eq!(outcome.thread.order_id, Some(first.id));

        ingest_message(&storage, &ex, inbound("<b@x>", "Re: Order #1001", "Ook #1002"))
            .await
            .unwrap();
        let thread = storage.get_thread_by_id(outcome.thread.id).await.unwrap().unwrap();
        let (relinked, plan) = auto_link(&storage, &ex, &thread).await.unwrap();
        assert!(!plan.changed);
        assert_eq!(relinked.order_id, Some(first.id));
    }

    #[tokio::test]
    async fn test_extract_ignores_outbound_and_quotes() {
        let storage = SeaOrmStorage::in_memory().await;
        let ex = extractor();
        let outcome = ingest_message(
            &storage,
            &ex,
            inbound(
                "<a@x>",
                "Vraag",
                "Bestelling 2001 graag.\n\nOn Mon, 3 Mar 2025, Shop wrote:\n> order 9999",
            ),
        )
        .await
        .unwrap();

        let mut outbound = inbound("<b@x>", "Re: Vraag", "Uw order 3001 is verzonden");
        outbound.direction = MessageDirection::Outbound;
        outbound.from_email = "info@dutchthrift.nl".into();
        outbound.to_emails = vec!["anna@example.nl".into()];
        outbound.in_reply_to = Some("<a@x>".into());
        ingest_message(&storage, &ex, outbound).await.unwrap();

        let info = extract_thread_info(&storage, &ex, &outcome.thread).await.unwrap();
        assert_eq!(info.order_numbers, vec!["2001".to_string()]);
    }
}
