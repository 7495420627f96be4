use super::{SeaOrmStorage, now_ts};
use crate::entity::orders::{ActiveModel, Column, Entity as Orders};
use crate::entity::to_json_text;
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    orders::{
        entities::{Order, OrderStatus},
        requests::{CreateOrderRequest, OrderListParams, UpdateOrderRequest},
        responses::OrderListResponse,
    },
    sync::OrderUpsert,
};
use crate::utils::sql::any_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_order_impl(&self, req: CreateOrderRequest) -> Result<Order> {
        let now = now_ts();

        let model = ActiveModel {
            external_id: Set(None),
            order_number: Set(req.order_number.trim().to_string()),
            customer_id: Set(req.customer_id),
            customer_email: Set(req.customer_email.map(|e| e.trim().to_lowercase())),
            customer_name: Set(req.customer_name),
            customer_phone: Set(req.customer_phone),
            total_cents: Set(req.total_cents),
            currency: Set(req.currency.unwrap_or_else(|| "EUR".to_string())),
            status: Set(req.status.unwrap_or(OrderStatus::Pending).to_string()),
            financial_status: Set(None),
            fulfillment_status: Set(None),
            tracking_numbers: Set(to_json_text(&req.tracking_numbers)),
            line_items: Set(to_json_text(&req.line_items)),
            shipping_address: Set(req.shipping_address.as_ref().map(to_json_text)),
            ordered_at: Set(req.ordered_at.map(|d| d.timestamp()).or(Some(now))),
            synced_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建订单失败: {e}")))?;

        Ok(result.into_order())
    }

    pub async fn get_order_by_id_impl(&self, id: i64) -> Result<Option<Order>> {
        let result = Orders::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单失败: {e}")))?;

        Ok(result.map(|m| m.into_order()))
    }

    /// 按 Shopify ID 查找，包含已删除的订单（同步不复活也不重复插入）
    pub async fn get_order_by_external_id_impl(&self, external_id: &str) -> Result<Option<Order>> {
        let result = Orders::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单失败: {e}")))?;

        Ok(result.map(|m| m.into_order()))
    }

    /// 订单号唯一，查找时包含已删除的订单
    pub async fn get_order_by_number_impl(&self, order_number: &str) -> Result<Option<Order>> {
        let result = Orders::find()
            .filter(Column::OrderNumber.eq(order_number.trim()))
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单失败: {e}")))?;

        Ok(result.map(|m| m.into_order()))
    }

    pub async fn find_orders_by_numbers_impl(&self, candidates: &[String]) -> Result<Vec<Order>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let result = Orders::find()
            .filter(Column::OrderNumber.is_in(candidates.iter().cloned()))
            .filter(Column::DeletedAt.is_null())
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("按订单号查询失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_order()).collect())
    }

    pub async fn list_orders_by_customer_impl(&self, customer_id: i64) -> Result<Vec<Order>> {
        let result = Orders::find()
            .filter(Column::CustomerId.eq(customer_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_desc(Column::OrderedAt)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户订单失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_order()).collect())
    }

    pub async fn list_orders_with_pagination_impl(
        &self,
        query: OrderListParams,
    ) -> Result<OrderListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Orders::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[
                    Column::OrderNumber,
                    Column::CustomerEmail,
                    Column::CustomerName,
                ],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_desc(Column::OrderedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单页数失败: {e}")))?;
        let orders = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单列表失败: {e}")))?;

        Ok(OrderListResponse {
            items: orders.into_iter().map(|m| m.into_order()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_order_impl(
        &self,
        id: i64,
        update: UpdateOrderRequest,
    ) -> Result<Option<Order>> {
        if self.get_order_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(customer_id) = update.customer_id {
            model.customer_id = Set(Some(customer_id));
        }
        if let Some(email) = update.customer_email {
            model.customer_email = Set(Some(email.trim().to_lowercase()));
        }
        if let Some(name) = update.customer_name {
            model.customer_name = Set(Some(name));
        }
        if let Some(phone) = update.customer_phone {
            model.customer_phone = Set(Some(phone));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(tracking_numbers) = update.tracking_numbers {
            model.tracking_numbers = Set(to_json_text(&tracking_numbers));
        }
        if let Some(address) = update.shipping_address {
            model.shipping_address = Set(Some(to_json_text(&address)));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新订单失败: {e}")))?;

        self.get_order_by_id_impl(id).await
    }

    pub async fn delete_order_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = Orders::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除订单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入同步来的订单
    ///
    /// 远端字段整体覆盖；`customer_id` 只在传入时更新，手工关联的客户不会被清空。
    pub async fn upsert_synced_order_impl(
        &self,
        existing_id: Option<i64>,
        upsert: &OrderUpsert,
        customer_id: Option<i64>,
        status: OrderStatus,
    ) -> Result<(Order, bool)> {
        let now = now_ts();

        let mut model = ActiveModel {
            external_id: Set(Some(upsert.external_id.clone())),
            order_number: Set(upsert.order_number.clone()),
            customer_email: Set(upsert.customer_email.clone()),
            customer_name: Set(upsert.customer_name.clone()),
            customer_phone: Set(upsert.customer_phone.clone()),
            total_cents: Set(upsert.total_cents),
            currency: Set(upsert.currency.clone()),
            status: Set(status.to_string()),
            financial_status: Set(upsert.financial_status.clone()),
            fulfillment_status: Set(upsert.fulfillment_status.clone()),
            tracking_numbers: Set(to_json_text(&upsert.tracking_numbers)),
            line_items: Set(to_json_text(&upsert.line_items)),
            shipping_address: Set(upsert.shipping_address.as_ref().map(to_json_text)),
            ordered_at: Set(upsert.ordered_at.map(|d| d.timestamp())),
            synced_at: Set(Some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        if customer_id.is_some() {
            model.customer_id = Set(customer_id);
        }

        let (result, created) = match existing_id {
            Some(id) => {
                model.id = Set(id);
                let updated = model.update(&self.db).await.map_err(|e| {
                    ThriftHubError::database_operation(format!("更新同步订单失败: {e}"))
                })?;
                (updated, false)
            }
            None => {
                model.customer_id = Set(customer_id);
                model.created_at = Set(now);
                model.deleted_at = Set(None);
                let inserted = model.insert(&self.db).await.map_err(|e| {
                    ThriftHubError::database_operation(format!("写入同步订单失败: {e}"))
                })?;
                (inserted, true)
            }
        };

        Ok((result.into_order(), created))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::orders::entities::LineItem;

    pub(crate) fn order_request(number: &str) -> CreateOrderRequest {
        CreateOrderRequest {
            order_number: number.to_string(),
            customer_id: None,
            customer_email: Some("Klant@Example.nl".into()),
            customer_name: Some("Klaas Klant".into()),
            customer_phone: None,
            total_cents: 4999,
            currency: None,
            status: None,
            tracking_numbers: vec![],
            line_items: vec![LineItem {
                title: "Canon AE-1".into(),
                sku: Some("CAM-1".into()),
                quantity: 1,
                price_cents: 4999,
            }],
            shipping_address: None,
            ordered_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_soft_delete_order() {
        let storage = SeaOrmStorage::in_memory().await;
        let order = storage.create_order_impl(order_request("#1001")).await.unwrap();
        assert_eq!(order.currency, "EUR");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.customer_email.as_deref(), Some("klant@example.nl"));
        assert_eq!(order.line_items.len(), 1);

        assert!(storage.delete_order_impl(order.id).await.unwrap());
        assert!(!storage.delete_order_impl(order.id).await.unwrap());
        assert!(storage.get_order_by_id_impl(order.id).await.unwrap().is_none());

        let list = storage
            .list_orders_with_pagination_impl(OrderListParams {
                pagination: Default::default(),
                status: None,
                customer_id: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 0);
    }

    #[tokio::test]
    async fn test_find_orders_by_numbers() {
        let storage = SeaOrmStorage::in_memory().await;
        storage.create_order_impl(order_request("#1001")).await.unwrap();
        storage.create_order_impl(order_request("#1002")).await.unwrap();

        let found = storage
            .find_orders_by_numbers_impl(&["#1002".into(), "1002".into(), "DT1002".into()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].order_number, "#1002");

        assert!(storage.find_orders_by_numbers_impl(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upsert_synced_order_keeps_manual_customer() {
        let storage = SeaOrmStorage::in_memory().await;
        let upsert = OrderUpsert {
            external_id: "450789469".into(),
            order_number: "#1003".into(),
            customer: None,
            customer_email: Some("klant@example.nl".into()),
            customer_name: None,
            customer_phone: None,
            total_cents: 12500,
            currency: "EUR".into(),
            status: OrderStatus::Processing,
            financial_status: Some("paid".into()),
            fulfillment_status: None,
            tracking_numbers: vec![],
            line_items: vec![],
            shipping_address: None,
            ordered_at: None,
            remote_updated_at: None,
        };

        let (order, created) = storage
            .upsert_synced_order_impl(None, &upsert, None, OrderStatus::Processing)
            .await
            .unwrap();
        assert!(created);
        assert!(order.synced_at.is_some());

        storage
            .update_order_impl(
                order.id,
                UpdateOrderRequest {
                    customer_name: Some("Handmatig".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let (again, created) = storage
            .upsert_synced_order_impl(Some(order.id), &upsert, None, OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(again.id, order.id);
        assert_eq!(again.status, OrderStatus::Shipped);

        let by_ext = storage
            .get_order_by_external_id_impl("450789469")
            .await
            .unwrap();
        assert_eq!(by_ext.map(|o| o.id), Some(order.id));
    }
}
