use super::{SeaOrmStorage, now_ts};
use crate::entity::returns::{ActiveModel, Column, Entity as Returns};
use crate::entity::to_json_text;
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    returns::{
        entities::{Return, ReturnStatus},
        requests::{CreateReturnRequest, ReturnListParams, UpdateReturnRequest},
        responses::ReturnListResponse,
    },
};
use crate::utils::random_code::record_number;
use crate::utils::sql::any_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建退货单，关联订单时沿用订单的客户
    pub async fn create_return_impl(&self, req: CreateReturnRequest) -> Result<Return> {
        let now = now_ts();

        let mut customer_id = req.customer_id;
        if customer_id.is_none()
            && let Some(order_id) = req.order_id
            && let Some(order) = self.get_order_by_id_impl(order_id).await?
        {
            customer_id = order.customer_id;
        }

        let status = req.status.unwrap_or(ReturnStatus::Requested);

        let model = ActiveModel {
            return_number: Set(record_number("RET")),
            order_id: Set(req.order_id),
            customer_id: Set(customer_id),
            reason: Set(req.reason),
            status: Set(status.to_string()),
            tracking_number: Set(req.tracking_number),
            refund_cents: Set(req.refund_cents),
            items: Set(Some(to_json_text(&req.items))),
            internal_notes: Set(req.internal_notes),
            received_at: Set((status == ReturnStatus::Received).then_some(now)),
            completed_at: Set(status.is_terminal().then_some(now)),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建退货单失败: {e}")))?;

        Ok(result.into_return())
    }

    pub async fn get_return_by_id_impl(&self, id: i64) -> Result<Option<Return>> {
        let result = Returns::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询退货单失败: {e}")))?;

        Ok(result.map(|m| m.into_return()))
    }

    pub async fn list_returns_by_order_impl(&self, order_id: i64) -> Result<Vec<Return>> {
        let result = Returns::find()
            .filter(Column::OrderId.eq(order_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单退货失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_return()).collect())
    }

    pub async fn list_returns_with_pagination_impl(
        &self,
        query: ReturnListParams,
    ) -> Result<ReturnListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Returns::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(order_id) = query.order_id {
            select = select.filter(Column::OrderId.eq(order_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[Column::ReturnNumber, Column::TrackingNumber, Column::Reason],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询退货总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询退货页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询退货列表失败: {e}")))?;

        Ok(ReturnListResponse {
            items: items.into_iter().map(|m| m.into_return()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新退货单
    ///
    /// 状态变为 received 时记录收货时间；进入终态时记录完成时间，离开终态时清空。
    pub async fn update_return_impl(
        &self,
        id: i64,
        update: UpdateReturnRequest,
    ) -> Result<Option<Return>> {
        let Some(existing) = self.get_return_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(order_id) = update.order_id {
            model.order_id = Set(Some(order_id));
        }
        if let Some(customer_id) = update.customer_id {
            model.customer_id = Set(Some(customer_id));
        }
        if let Some(reason) = update.reason {
            model.reason = Set(Some(reason));
        }
        if let Some(tracking_number) = update.tracking_number {
            model.tracking_number = Set(Some(tracking_number));
        }
        if let Some(refund_cents) = update.refund_cents {
            model.refund_cents = Set(Some(refund_cents));
        }
        if let Some(items) = update.items {
            model.items = Set(Some(to_json_text(&items)));
        }
        if let Some(internal_notes) = update.internal_notes {
            model.internal_notes = Set(Some(internal_notes));
        }

        if let Some(status) = update.status
            && status != existing.status
        {
            model.status = Set(status.to_string());
            if status == ReturnStatus::Received && existing.received_at.is_none() {
                model.received_at = Set(Some(now));
            }
            if status.is_terminal() {
                model.completed_at = Set(Some(now));
            } else if existing.status.is_terminal() {
                model.completed_at = Set(None);
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新退货单失败: {e}")))?;

        self.get_return_by_id_impl(id).await
    }

    pub async fn delete_return_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = Returns::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除退货单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn refund_approved_returns_impl(&self, order_id: i64) -> Result<u64> {
        let now = now_ts();
        let result = Returns::update_many()
            .col_expr(Column::Status, Expr::value(ReturnStatus::Refunded.as_str()))
            .col_expr(Column::CompletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::OrderId.eq(order_id))
            .filter(Column::Status.eq(ReturnStatus::ApprovedRefund.as_str()))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新退款退货失败: {e}")))?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customers::requests::CreateCustomerRequest;
    use crate::storage::sea_orm_storage::orders::tests::order_request;

    #[tokio::test]
    async fn test_create_return_inherits_order_customer() {
        let storage = SeaOrmStorage::in_memory().await;
        let customer = storage
            .create_customer_impl(CreateCustomerRequest {
                email: Some("klant@example.nl".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let mut req = order_request("#2001");
        req.customer_id = Some(customer.id);
        let order = storage.create_order_impl(req).await.unwrap();

        let ret = storage
            .create_return_impl(CreateReturnRequest {
                order_id: Some(order.id),
                reason: Some("Lens heeft schimmel".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(ret.return_number.starts_with("RET-"));
        assert_eq!(ret.customer_id, Some(customer.id));
        assert_eq!(ret.status, ReturnStatus::Requested);
        assert!(ret.completed_at.is_none());
    }

    #[tokio::test]
    async fn test_status_changes_stamp_dates() {
        let storage = SeaOrmStorage::in_memory().await;
        let ret = storage
            .create_return_impl(CreateReturnRequest::default())
            .await
            .unwrap();

        let received = storage
            .update_return_impl(
                ret.id,
                UpdateReturnRequest {
                    status: Some(ReturnStatus::Received),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(received.received_at.is_some());
        assert!(received.completed_at.is_none());

        let closed = storage
            .update_return_impl(
                ret.id,
                UpdateReturnRequest {
                    status: Some(ReturnStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(closed.completed_at.is_some());

        let reopened = storage
            .update_return_impl(
                ret.id,
                UpdateReturnRequest {
                    status: Some(ReturnStatus::Inspecting),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.completed_at.is_none());
        assert!(reopened.received_at.is_some());
    }

    #[tokio::test]
    async fn test_refund_approved_returns_only_touches_approved() {
        let storage = SeaOrmStorage::in_memory().await;
        let order = storage.create_order_impl(order_request("#2002")).await.unwrap();

        let approved = storage
            .create_return_impl(CreateReturnRequest {
                order_id: Some(order.id),
                status: Some(ReturnStatus::ApprovedRefund),
                ..Default::default()
            })
            .await
            .unwrap();
        let inspecting = storage
            .create_return_impl(CreateReturnRequest {
                order_id: Some(order.id),
                status: Some(ReturnStatus::Inspecting),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(storage.refund_approved_returns_impl(order.id).await.unwrap(), 1);

        let approved = storage.get_return_by_id_impl(approved.id).await.unwrap().unwrap();
        assert_eq!(approved.status, ReturnStatus::Refunded);
        assert!(approved.completed_at.is_some());
        let inspecting = storage.get_return_by_id_impl(inspecting.id).await.unwrap().unwrap();
        assert_eq!(inspecting.status, ReturnStatus::Inspecting);

        assert_eq!(storage.list_returns_by_order_impl(order.id).await.unwrap().len(), 2);
    }
}
