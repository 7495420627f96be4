use super::{SeaOrmStorage, now_ts};
use crate::entity::email_messages::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as EmailMessages,
};
use crate::entity::email_threads::{ActiveModel, Column, Entity as EmailThreads};
use crate::entity::to_json_text;
use crate::errors::{Result, ThriftHubError};
use crate::linking::ThreadLinks;
use crate::models::{
    PaginationInfo,
    email_threads::{
        entities::{EmailMessage, EmailThread, MessageDirection, ThreadStatus},
        requests::{IngestEmailRequest, NewEmailThread, ThreadListParams, UpdateThreadRequest},
        responses::ThreadListResponse,
    },
};
use crate::utils::sql::any_contains;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::ExprTrait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    pub async fn get_thread_by_id_impl(&self, id: i64) -> Result<Option<EmailThread>> {
        let result = EmailThreads::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询邮件会话失败: {e}")))?;

        Ok(result.map(|m| m.into_thread()))
    }

    /// 收件箱列表，最近活跃的在前
    pub async fn list_threads_with_pagination_impl(
        &self,
        query: ThreadListParams,
    ) -> Result<ThreadListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = EmailThreads::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(is_read) = query.is_read {
            select = select.filter(Column::IsRead.eq(is_read));
        }
        if let Some(assigned_to) = query.assigned_to {
            select = select.filter(Column::AssignedTo.eq(assigned_to));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[
                    Column::Subject,
                    Column::ParticipantEmail,
                    Column::ParticipantName,
                ],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_desc(Column::LastMessageAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询会话总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询会话页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询会话列表失败: {e}")))?;

        Ok(ThreadListResponse {
            items: items.into_iter().map(|m| m.into_thread()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn list_threads_by_order_impl(&self, order_id: i64) -> Result<Vec<EmailThread>> {
        let result = EmailThreads::find()
            .filter(Column::OrderId.eq(order_id))
            .order_by_desc(Column::LastMessageAt)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单会话失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_thread()).collect())
    }

    pub async fn get_message_by_message_id_impl(
        &self,
        message_id: &str,
    ) -> Result<Option<EmailMessage>> {
        let result = EmailMessages::find()
            .filter(MessageColumn::MessageId.eq(message_id))
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询邮件失败: {e}")))?;

        Ok(result.map(|m| m.into_message()))
    }

    pub async fn find_thread_by_message_ids_impl(
        &self,
        message_ids: &[String],
    ) -> Result<Option<EmailThread>> {
        if message_ids.is_empty() {
            return Ok(None);
        }

        let message = EmailMessages::find()
            .filter(MessageColumn::MessageId.is_in(message_ids.iter().cloned()))
            .order_by_desc(MessageColumn::SentAt)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询邮件失败: {e}")))?;

        match message {
            Some(message) => self.get_thread_by_id_impl(message.thread_id).await,
            None => Ok(None),
        }
    }

    pub async fn find_open_thread_by_subject_impl(
        &self,
        normalized_subject: &str,
        participant_email: &str,
    ) -> Result<Option<EmailThread>> {
        let result = EmailThreads::find()
            .filter(Column::NormalizedSubject.eq(normalized_subject))
            .filter(Column::ParticipantEmail.eq(participant_email.to_lowercase()))
            .filter(Column::Status.is_in([
                ThreadStatus::Open.as_str(),
                ThreadStatus::Pending.as_str(),
            ]))
            .order_by_desc(Column::LastMessageAt)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询邮件会话失败: {e}")))?;

        Ok(result.map(|m| m.into_thread()))
    }

    pub async fn create_thread_impl(&self, thread: NewEmailThread) -> Result<EmailThread> {
        let now = now_ts();

        let model = ActiveModel {
            subject: Set(thread.subject),
            normalized_subject: Set(thread.normalized_subject),
            participant_email: Set(thread.participant_email.to_lowercase()),
            participant_name: Set(thread.participant_name),
            status: Set(thread.status.to_string()),
            is_read: Set(false),
            assigned_to: Set(None),
            customer_id: Set(None),
            order_id: Set(None),
            case_id: Set(None),
            repair_id: Set(None),
            return_id: Set(None),
            message_count: Set(0),
            last_message_at: Set(thread.last_message_at.timestamp()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建邮件会话失败: {e}")))?;

        Ok(result.into_thread())
    }

    /// 在一个事务里写入邮件并刷新所属会话。Message-ID 冲突时返回 Conflict，会话不存在时返回 NotFound
    pub async fn append_message_impl(
        &self,
        thread_id: i64,
        req: &IngestEmailRequest,
        sent_at: DateTime<Utc>,
    ) -> Result<(EmailMessage, EmailThread)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("开启事务失败: {e}")))?;

        let message = insert_message(&txn, thread_id, req, sent_at).await?;
        let inbound = req.direction == MessageDirection::Inbound;
        if bump_thread(&txn, thread_id, sent_at, inbound).await? == 0 {
            // 事务随 txn 丢弃回滚
            return Err(ThriftHubError::not_found(format!("邮件会话 {thread_id} 不存在")));
        }

        txn.commit()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("提交事务失败: {e}")))?;

        let thread = self
            .get_thread_by_id_impl(thread_id)
            .await?
            .ok_or_else(|| ThriftHubError::not_found(format!("邮件会话 {thread_id} 不存在")))?;
        Ok((message.into_message(), thread))
    }

    /// 会话内邮件，按发送时间正序
    pub async fn list_thread_messages_impl(&self, thread_id: i64) -> Result<Vec<EmailMessage>> {
        let result = EmailMessages::find()
            .filter(MessageColumn::ThreadId.eq(thread_id))
            .order_by_asc(MessageColumn::SentAt)
            .order_by_asc(MessageColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询会话邮件失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_message()).collect())
    }

    pub async fn update_thread_impl(
        &self,
        id: i64,
        update: UpdateThreadRequest,
    ) -> Result<Option<EmailThread>> {
        if self.get_thread_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(is_read) = update.is_read {
            model.is_read = Set(is_read);
        }
        if let Some(assigned_to) = update.assigned_to {
            model.assigned_to = Set((assigned_to > 0).then_some(assigned_to));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新邮件会话失败: {e}")))?;

        self.get_thread_by_id_impl(id).await
    }

    /// 整体写入五个关联字段
    pub async fn set_thread_links_impl(
        &self,
        id: i64,
        links: &ThreadLinks,
    ) -> Result<Option<EmailThread>> {
        if self.get_thread_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            customer_id: Set(links.customer_id),
            order_id: Set(links.order_id),
            return_id: Set(links.return_id),
            repair_id: Set(links.repair_id),
            case_id: Set(links.case_id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新会话关联失败: {e}")))?;

        self.get_thread_by_id_impl(id).await
    }

    /// 硬删除会话及其邮件
    pub async fn delete_thread_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("开启事务失败: {e}")))?;

        EmailMessages::delete_many()
            .filter(MessageColumn::ThreadId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除会话邮件失败: {e}")))?;

        let result = EmailThreads::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除邮件会话失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

async fn insert_message<C: ConnectionTrait>(
    db: &C,
    thread_id: i64,
    req: &IngestEmailRequest,
    sent_at: DateTime<Utc>,
) -> Result<crate::entity::email_messages::Model> {
    let model = MessageActiveModel {
        thread_id: Set(thread_id),
        message_id: Set(req.message_id.clone()),
        in_reply_to: Set(req.in_reply_to.clone()),
        reference_ids: Set((!req.references.is_empty()).then(|| to_json_text(&req.references))),
        direction: Set(req.direction.to_string()),
        from_email: Set(req.from_email.to_lowercase()),
        from_name: Set(req.from_name.clone()),
        to_emails: Set(to_json_text(&req.to_emails)),
        subject: Set(req.subject.clone()),
        body_text: Set(req.body_text.clone()),
        body_html: Set(req.body_html.clone()),
        sent_at: Set(sent_at.timestamp()),
        created_at: Set(now_ts()),
        ..Default::default()
    };

    model.insert(db).await.map_err(|e| {
        if matches!(
            e.sql_err(),
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
        ) {
            ThriftHubError::conflict(format!("邮件已存在: {}", req.message_id))
        } else {
            ThriftHubError::database_operation(format!("保存邮件失败: {e}"))
        }
    })
}

/// 会话计数在数据库里自增，last_message_at 只前进不后退。
/// 入站邮件把会话标为未读并重新打开已关闭的会话。返回受影响的会话行数
pub(crate) async fn bump_thread<C: ConnectionTrait>(
    db: &C,
    thread_id: i64,
    sent_at: DateTime<Utc>,
    inbound: bool,
) -> Result<u64> {
    let failed = |e: sea_orm::DbErr| ThriftHubError::database_operation(format!("更新邮件会话失败: {e}"));

    let mut counter = EmailThreads::update_many()
        .col_expr(Column::MessageCount, Expr::col(Column::MessageCount).add(1))
        .col_expr(Column::UpdatedAt, Expr::value(now_ts()))
        .filter(Column::Id.eq(thread_id));
    if inbound {
        counter = counter.col_expr(Column::IsRead, Expr::value(false));
    }
    let affected = counter.exec(db).await.map_err(failed)?.rows_affected;
    if affected == 0 {
        return Ok(0);
    }

    EmailThreads::update_many()
        .col_expr(Column::LastMessageAt, Expr::value(sent_at.timestamp()))
        .filter(Column::Id.eq(thread_id))
        .filter(Column::LastMessageAt.lt(sent_at.timestamp()))
        .exec(db)
        .await
        .map_err(failed)?;

    if inbound {
        EmailThreads::update_many()
            .col_expr(Column::Status, Expr::value(ThreadStatus::Open.as_str()))
            .filter(Column::Id.eq(thread_id))
            .filter(Column::Status.eq(ThreadStatus::Closed.as_str()))
            .exec(db)
            .await
            .map_err(failed)?;
    }

    Ok(affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ingest(message_id: &str, direction: MessageDirection) -> IngestEmailRequest {
        IngestEmailRequest {
            message_id: message_id.to_string(),
            in_reply_to: None,
            references: vec![],
            direction,
            from_email: "Klant@Example.nl".into(),
            from_name: Some("Klant".into()),
            to_emails: vec!["info@dutchthrift.nl".into()],
            subject: "Vraag over bestelling #1001".into(),
            body_text: Some("Waar blijft mijn pakket?".into()),
            body_html: None,
            sent_at: None,
        }
    }

    async fn new_thread(storage: &SeaOrmStorage, at: DateTime<Utc>) -> EmailThread {
        storage
            .create_thread_impl(NewEmailThread {
                subject: "Vraag over bestelling #1001".into(),
                normalized_subject: "vraag over bestelling #1001".into(),
                participant_email: "Klant@Example.nl".into(),
                participant_name: Some("Klant".into()),
                status: ThreadStatus::Open,
                last_message_at: at,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_messages_thread_lookup_and_order() {
        let storage = SeaOrmStorage::in_memory().await;
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let thread = new_thread(&storage, t0).await;

        storage
            .append_message_impl(thread.id, &ingest("<b@x>", MessageDirection::Inbound), t1)
            .await
            .unwrap();
        let (_, thread_after) = storage
            .append_message_impl(thread.id, &ingest("<a@x>", MessageDirection::Inbound), t0)
            .await
            .unwrap();
        assert_eq!(thread_after.message_count, 2);
        assert_eq!(thread_after.last_message_at, t1);

        let messages = storage.list_thread_messages_impl(thread.id).await.unwrap();
        assert_eq!(messages[0].message_id, "<a@x>");
        assert_eq!(messages[1].message_id, "<b@x>");
        assert_eq!(messages[0].from_email, "klant@example.nl");

        let found = storage
            .find_thread_by_message_ids_impl(&["<zzz@x>".into(), "<b@x>".into()])
            .await
            .unwrap();
        assert_eq!(found.map(|t| t.id), Some(thread.id));

        let dup = storage
            .append_message_impl(thread.id, &ingest("<a@x>", MessageDirection::Inbound), t0)
            .await
            .unwrap_err();
        assert_eq!(dup.code(), "E014");

        // 重复邮件整体回滚，计数不变
        let thread = storage.get_thread_by_id_impl(thread.id).await.unwrap().unwrap();
        assert_eq!(thread.message_count, 2);
    }

    #[tokio::test]
    async fn test_append_to_missing_thread_rolls_back() {
        let storage = SeaOrmStorage::in_memory().await;
        let err = storage
            .append_message_impl(999, &ingest("<orphan@x>", MessageDirection::Inbound), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ThriftHubError::NotFound(_)));
        assert!(storage
            .get_message_by_message_id_impl("<orphan@x>")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_append_reopens_on_inbound() {
        let storage = SeaOrmStorage::in_memory().await;
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let thread = new_thread(&storage, t0).await;

        storage
            .update_thread_impl(
                thread.id,
                UpdateThreadRequest {
                    status: Some(ThreadStatus::Closed),
                    is_read: Some(true),
                    assigned_to: None,
                },
            )
            .await
            .unwrap();

        // 外发邮件不改变状态
        let t1 = t0 + chrono::Duration::hours(1);
        let (_, touched) = storage
            .append_message_impl(thread.id, &ingest("<out@x>", MessageDirection::Outbound), t1)
            .await
            .unwrap();
        assert_eq!(touched.status, ThreadStatus::Closed);
        assert!(touched.is_read);
        assert_eq!(touched.message_count, 1);
        assert_eq!(touched.last_message_at, t1);

        // 较早的入站邮件不回退 last_message_at
        let (_, touched) = storage
            .append_message_impl(thread.id, &ingest("<in@x>", MessageDirection::Inbound), t0)
            .await
            .unwrap();
        assert_eq!(touched.status, ThreadStatus::Open);
        assert!(!touched.is_read);
        assert_eq!(touched.message_count, 2);
        assert_eq!(touched.last_message_at, t1);
    }

    #[tokio::test]
    async fn test_inbound_does_not_reopen_spam() {
        let storage = SeaOrmStorage::in_memory().await;
        let thread = new_thread(&storage, Utc::now()).await;
        storage
            .update_thread_impl(
                thread.id,
                UpdateThreadRequest {
                    status: Some(ThreadStatus::Spam),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let (_, touched) = storage
            .append_message_impl(thread.id, &ingest("<spam@x>", MessageDirection::Inbound), Utc::now())
            .await
            .unwrap();
        assert_eq!(touched.status, ThreadStatus::Spam);
    }

    #[tokio::test]
    async fn test_concurrent_bumps_count_every_message() {
        let storage = SeaOrmStorage::in_memory().await;
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let thread_id = new_thread(&storage, t0).await.id;

        let bumps = (0..8).map(|i| {
            let db = storage.db.clone();
            let at = t0 + chrono::Duration::minutes(i);
            tokio::spawn(async move { bump_thread(&db, thread_id, at, true).await })
        });
        for handle in futures_util::future::join_all(bumps).await {
            assert_eq!(handle.unwrap().unwrap(), 1);
        }

        let thread = storage.get_thread_by_id_impl(thread_id).await.unwrap().unwrap();
        assert_eq!(thread.message_count, 8);
        assert_eq!(thread.last_message_at, t0 + chrono::Duration::minutes(7));
    }

    #[tokio::test]
    async fn test_concurrent_appends_count_every_message() {
        let storage = std::sync::Arc::new(SeaOrmStorage::in_memory().await);
        let thread_id = new_thread(&storage, Utc::now()).await.id;

        let appends = (0..8).map(|i| {
            let storage = storage.clone();
            tokio::spawn(async move {
                storage
                    .append_message_impl(
                        thread_id,
                        &ingest(&format!("<burst-{i}@x>"), MessageDirection::Inbound),
                        Utc::now(),
                    )
                    .await
            })
        });
        for handle in futures_util::future::join_all(appends).await {
            handle.unwrap().unwrap();
        }

        let thread = storage.get_thread_by_id_impl(thread_id).await.unwrap().unwrap();
        assert_eq!(thread.message_count, 8);
        assert_eq!(storage.list_thread_messages_impl(thread_id).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_subject_match_ignores_closed_threads() {
        let storage = SeaOrmStorage::in_memory().await;
        let thread = new_thread(&storage, Utc::now()).await;

        let found = storage
            .find_open_thread_by_subject_impl("vraag over bestelling #1001", "KLANT@example.nl")
            .await
            .unwrap();
        assert_eq!(found.map(|t| t.id), Some(thread.id));

        storage
            .update_thread_impl(
                thread.id,
                UpdateThreadRequest {
                    status: Some(ThreadStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(storage
            .find_open_thread_by_subject_impl("vraag over bestelling #1001", "klant@example.nl")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_thread_removes_messages() {
        let storage = SeaOrmStorage::in_memory().await;
        let thread = new_thread(&storage, Utc::now()).await;
        storage
            .append_message_impl(thread.id, &ingest("<c@x>", MessageDirection::Inbound), Utc::now())
            .await
            .unwrap();

        assert!(storage.delete_thread_impl(thread.id).await.unwrap());
        assert!(storage.get_message_by_message_id_impl("<c@x>").await.unwrap().is_none());
        assert!(!storage.delete_thread_impl(thread.id).await.unwrap());
    }
}
