//! Shopify 增量订单同步
//!
//! 按 `updated_at` 水位拉取所有分页，依次写入客户和订单。
//! 已写入的部分在失败时保留，水位只在整轮成功后推进。

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::config::AppConfig;
use crate::errors::{Result, ThriftHubError};
use crate::models::customers::entities::Customer;
use crate::models::customers::requests::{CreateCustomerRequest, UpdateCustomerRequest};
use crate::models::orders::entities::OrderStatus;
use crate::models::sync::{
    CustomerUpsert, OrderUpsert, SHOPIFY_ORDERS_KEY, SyncReport, SyncState, SyncStatus,
};
use crate::shopify::{OrderSource, ShopifyClient, map_order, merge_status};
use crate::storage::Storage;

use super::SYNC_LOCK;

/// 用配置中的 Shopify 凭据跑一轮同步；已有同步在运行时返回 Conflict
pub async fn run_sync(storage: Arc<dyn Storage>) -> Result<SyncReport> {
    let _guard = SYNC_LOCK
        .try_lock()
        .map_err(|_| ThriftHubError::conflict("已有同步任务在运行"))?;

    let config = &AppConfig::get().shopify;
    let client = ShopifyClient::new(config.clone())?;
    sync_orders(storage.as_ref(), &client).await
}

/// 同步主流程，调用方负责互斥
pub async fn sync_orders(storage: &dyn Storage, source: &dyn OrderSource) -> Result<SyncReport> {
    let mut state = storage
        .get_sync_state(SHOPIFY_ORDERS_KEY)
        .await?
        .unwrap_or_else(|| SyncState::idle(SHOPIFY_ORDERS_KEY));

    let since = state.last_synced_at;
    state.last_status = SyncStatus::Running;
    state.last_run_at = Some(Utc::now());
    state.last_error = None;
    storage.save_sync_state(&state).await?;

    info!(
        "Shopify sync started (updated since {})",
        since.map(|d| d.to_rfc3339()).unwrap_or_else(|| "beginning".into())
    );

    let mut report = SyncReport::default();
    match pull_all(storage, source, since, &mut report).await {
        Ok(()) => {
            state.last_status = SyncStatus::Success;
            state.last_synced_at = report.last_synced_at.or(since);
            state.items_synced = report.orders_synced();
            storage.save_sync_state(&state).await?;
            info!(
                "Shopify sync finished: {} created, {} updated, {} customers, {} returns refunded",
                report.orders_created,
                report.orders_updated,
                report.customers_created,
                report.returns_refunded
            );
            Ok(report)
        }
        Err(e) => {
            error!("Shopify sync failed after {} pages: {}", report.pages, e);
            state.last_status = SyncStatus::Failed;
            state.last_error = Some(e.message().to_string());
            state.items_synced = report.orders_synced();
            storage.save_sync_state(&state).await?;
            Err(e)
        }
    }
}

async fn pull_all(
    storage: &dyn Storage,
    source: &dyn OrderSource,
    since: Option<DateTime<Utc>>,
    report: &mut SyncReport,
) -> Result<()> {
    let mut page_info: Option<String> = None;

    loop {
        let page = source
            .fetch_orders_page(since, page_info.as_deref())
            .await?;
        report.pages += 1;
        debug!("Sync page {}: {} orders", report.pages, page.orders.len());

        for remote in page.orders {
            let upsert = map_order(remote);
            sync_order(storage, &upsert, report).await?;

            if let Some(updated) = upsert.remote_updated_at {
                report.last_synced_at = Some(match report.last_synced_at {
                    Some(current) if current >= updated => current,
                    _ => updated,
                });
            }
        }

        match page.next_page_info {
            // 游标没有前进时停止，避免死循环
            Some(next) if page_info.as_deref() != Some(next.as_str()) => page_info = Some(next),
            _ => return Ok(()),
        }
    }
}

async fn sync_order(storage: &dyn Storage, upsert: &OrderUpsert, report: &mut SyncReport) -> Result<()> {
    let customer_id = match &upsert.customer {
        Some(customer) => sync_customer(storage, customer, report).await?,
        None => match upsert.customer_email.as_deref() {
            Some(email) => storage.get_customer_by_email(email).await?.map(|c| c.id),
            None => None,
        },
    };

    let existing = match storage.get_order_by_external_id(&upsert.external_id).await? {
        Some(order) => Some(order),
        None => storage.get_order_by_number(&upsert.order_number).await?,
    };
    let status = merge_status(existing.as_ref().map(|o| o.status), upsert.status);

    let (order, created) = storage
        .upsert_synced_order(existing.map(|o| o.id), upsert, customer_id, status)
        .await?;
    if created {
        report.orders_created += 1;
    } else {
        report.orders_updated += 1;
    }

    if order.status == OrderStatus::Refunded {
        let refunded = storage.refund_approved_returns(order.id).await?;
        if refunded > 0 {
            info!(
                "Order {} refunded in Shopify, {} return(s) marked refunded",
                order.order_number, refunded
            );
        }
        report.returns_refunded += refunded as i64;
    }

    Ok(())
}

/// 只补全本地缺失或远端有变化的字段，本地备注不动
fn customer_changes(existing: &Customer, remote: &CustomerUpsert) -> Option<UpdateCustomerRequest> {
    fn changed(local: &Option<String>, remote: &Option<String>) -> Option<String> {
        match remote {
            Some(value) if local.as_ref() != Some(value) => Some(value.clone()),
            _ => None,
        }
    }

    let update = UpdateCustomerRequest {
        external_id: changed(&existing.external_id, &remote.external_id),
        email: None,
        first_name: changed(&existing.first_name, &remote.first_name),
        last_name: changed(&existing.last_name, &remote.last_name),
        phone: changed(&existing.phone, &remote.phone),
        notes: None,
    };

    let has_changes = update.external_id.is_some()
        || update.first_name.is_some()
        || update.last_name.is_some()
        || update.phone.is_some();
    has_changes.then_some(update)
}

async fn sync_customer(
    storage: &dyn Storage,
    remote: &CustomerUpsert,
    report: &mut SyncReport,
) -> Result<Option<i64>> {
    let mut existing = match remote.external_id.as_deref() {
        Some(external_id) => storage.get_customer_by_external_id(external_id).await?,
        None => None,
    };
    if existing.is_none()
        && let Some(email) = remote.email.as_deref()
    {
        existing = storage.get_customer_by_email(email).await?;
    }

    if let Some(customer) = existing {
        let mut update = customer_changes(&customer, remote);
        // 本地没有邮箱时补上，前提是没有被其他客户占用
        if customer.email.is_none()
            && let Some(email) = remote.email.as_deref()
            && storage.get_customer_by_email(email).await?.is_none()
        {
            update.get_or_insert_with(UpdateCustomerRequest::default).email = Some(email.to_string());
        }
        if let Some(update) = update {
            storage.update_customer(customer.id, update).await?;
        }
        return Ok(Some(customer.id));
    }

    if remote.external_id.is_none() && remote.email.is_none() {
        return Ok(None);
    }

    let created = storage
        .create_customer(CreateCustomerRequest {
            external_id: remote.external_id.clone(),
            email: remote.email.clone(),
            first_name: remote.first_name.clone(),
            last_name: remote.last_name.clone(),
            phone: remote.phone.clone(),
            notes: None,
        })
        .await?;
    report.customers_created += 1;
    Ok(Some(created.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::returns::entities::ReturnStatus;
    use crate::models::returns::requests::CreateReturnRequest;
    use crate::models::orders::requests::UpdateOrderRequest;
    use crate::shopify::{OrdersPage, ShopifyOrder};
    use crate::shopify::types::ShopifyCustomer;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use chrono::TimeZone;

    /// 内存订单源：按 page_info 返回预置的分页，`fail_on` 页返回错误
    struct StubSource {
        pages: Vec<Vec<ShopifyOrder>>,
        fail_on: Option<usize>,
    }

    #[async_trait::async_trait]
    impl OrderSource for StubSource {
        async fn fetch_orders_page(
            &self,
            _updated_at_min: Option<DateTime<Utc>>,
            page_info: Option<&str>,
        ) -> Result<OrdersPage> {
            let index = page_info
                .and_then(|p| p.strip_prefix("p"))
                .and_then(|p| p.parse::<usize>().ok())
                .unwrap_or(0);
            if self.fail_on == Some(index) {
                return Err(ThriftHubError::external_service("Shopify returned 502"));
            }
            let next = index + 1;
            Ok(OrdersPage {
                orders: self.pages.get(index).cloned().unwrap_or_default(),
                next_page_info: (next < self.pages.len()).then(|| format!("p{next}")),
            })
        }
    }

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    fn remote_order(id: i64, name: &str, updated_hour: u32) -> ShopifyOrder {
        ShopifyOrder {
            id,
            name: name.into(),
            email: Some("Anna@Example.nl".into()),
            updated_at: Some(ts(updated_hour)),
            financial_status: Some("paid".into()),
            total_price: Some("49.95".into()),
            currency: Some("EUR".into()),
            customer: Some(ShopifyCustomer {
                id: 77,
                email: Some("anna@example.nl".into()),
                first_name: Some("Anna".into()),
                last_name: Some("de Vries".into()),
                phone: None,
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sync_pages_and_advances_watermark() {
        let storage = SeaOrmStorage::in_memory().await;
        let source = StubSource {
            pages: vec![
                vec![remote_order(1, "#1001", 9), remote_order(2, "#1002", 11)],
                vec![remote_order(3, "#1003", 10)],
            ],
            fail_on: None,
        };

        let report = sync_orders(&storage, &source).await.unwrap();
        assert_eq!(report.pages, 2);
        assert_eq!(report.orders_created, 3);
        assert_eq!(report.customers_created, 1);
        assert_eq!(report.last_synced_at, Some(ts(11)));

        let state = storage.get_sync_state(SHOPIFY_ORDERS_KEY).await.unwrap().unwrap();
        assert_eq!(state.last_status, SyncStatus::Success);
        assert_eq!(state.last_synced_at, Some(ts(11)));
        assert_eq!(state.items_synced, 3);

        let order = storage.get_order_by_number("#1002").await.unwrap().unwrap();
        assert_eq!(order.total_cents, 4995);
        assert_eq!(order.status, OrderStatus::Processing);
        assert!(order.customer_id.is_some());

        // 第二轮：没有新订单时水位不变
        let empty = StubSource {
            pages: vec![vec![]],
            fail_on: None,
        };
        let report = sync_orders(&storage, &empty).await.unwrap();
        assert_eq!(report.orders_synced(), 0);
        let state = storage.get_sync_state(SHOPIFY_ORDERS_KEY).await.unwrap().unwrap();
        assert_eq!(state.last_synced_at, Some(ts(11)));
    }

    #[tokio::test]
    async fn test_customer_matched_by_email_gets_external_id() {
        let storage = SeaOrmStorage::in_memory().await;
        let local = storage
            .create_customer(CreateCustomerRequest {
                email: Some("anna@example.nl".into()),
                notes: Some("vaste klant".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let source = StubSource {
            pages: vec![vec![remote_order(1, "#1001", 9)]],
            fail_on: None,
        };
        let report = sync_orders(&storage, &source).await.unwrap();
        assert_eq!(report.customers_created, 0);

        let customer = storage.get_customer_by_id(local.id).await.unwrap().unwrap();
        assert_eq!(customer.external_id.as_deref(), Some("77"));
        assert_eq!(customer.first_name.as_deref(), Some("Anna"));
        assert_eq!(customer.notes.as_deref(), Some("vaste klant"));

        let order = storage.get_order_by_number("#1001").await.unwrap().unwrap();
        assert_eq!(order.customer_id, Some(local.id));
    }

    #[tokio::test]
    async fn test_delivered_is_kept_and_refund_reconciles_returns() {
        let storage = SeaOrmStorage::in_memory().await;
        let first = StubSource {
            pages: vec![vec![remote_order(1, "#1001", 9)]],
            fail_on: None,
        };
        sync_orders(&storage, &first).await.unwrap();
        let order = storage.get_order_by_number("#1001").await.unwrap().unwrap();

        storage
            .update_order(
                order.id,
                UpdateOrderRequest {
                    status: Some(OrderStatus::Delivered),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let mut shipped = remote_order(1, "#1001", 10);
        shipped.fulfillment_status = Some("fulfilled".into());
        let second = StubSource {
            pages: vec![vec![shipped]],
            fail_on: None,
        };
        sync_orders(&storage, &second).await.unwrap();
        let order = storage.get_order_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);

        let ret = storage
            .create_return(CreateReturnRequest {
                order_id: Some(order.id),
                status: Some(ReturnStatus::ApprovedRefund),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut refunded = remote_order(1, "#1001", 12);
        refunded.financial_status = Some("refunded".into());
        let third = StubSource {
            pages: vec![vec![refunded]],
            fail_on: None,
        };
        let report = sync_orders(&storage, &third).await.unwrap();
        assert_eq!(report.orders_updated, 1);
        assert_eq!(report.returns_refunded, 1);

        let ret = storage.get_return_by_id(ret.id).await.unwrap().unwrap();
        assert_eq!(ret.status, ReturnStatus::Refunded);
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_progress_and_watermark() {
        let storage = SeaOrmStorage::in_memory().await;
        let source = StubSource {
            pages: vec![vec![remote_order(1, "#1001", 9)], vec![remote_order(2, "#1002", 10)]],
            fail_on: Some(1),
        };

        let err = sync_orders(&storage, &source).await.unwrap_err();
        assert_eq!(err.code(), "E013");

        let state = storage.get_sync_state(SHOPIFY_ORDERS_KEY).await.unwrap().unwrap();
        assert_eq!(state.last_status, SyncStatus::Failed);
        assert!(state.last_error.unwrap().contains("502"));
        assert!(state.last_synced_at.is_none());
        assert!(storage.get_order_by_number("#1001").await.unwrap().is_some());
    }

    #[test]
    fn test_customer_changes_ignores_equal_fields() {
        let now = Utc::now();
        let existing = Customer {
            id: 1,
            external_id: Some("77".into()),
            email: Some("anna@example.nl".into()),
            first_name: Some("Anna".into()),
            last_name: None,
            phone: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let same = CustomerUpsert {
            external_id: Some("77".into()),
            first_name: Some("Anna".into()),
            ..Default::default()
        };
        assert!(customer_changes(&existing, &same).is_none());

        let more = CustomerUpsert {
            last_name: Some("Jansen".into()),
            ..same
        };
        let update = customer_changes(&existing, &more).unwrap();
        assert_eq!(update.last_name.as_deref(), Some("Jansen"));
        assert!(update.first_name.is_none());
    }

    #[tokio::test]
    async fn test_run_sync_rejects_while_running() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await);

        let held = SYNC_LOCK.lock().await;
        assert!(super::super::is_running());
        let err = run_sync(storage.clone()).await.unwrap_err();
        assert!(matches!(err, ThriftHubError::Conflict(_)));
        drop(held);

        // 拒绝时不写同步状态
        assert!(storage.get_sync_state(SHOPIFY_ORDERS_KEY).await.unwrap().is_none());
    }
}
