use super::{SeaOrmStorage, now_ts};
use crate::entity::purchase_orders::{ActiveModel, Column, Entity as PurchaseOrders};
use crate::entity::to_json_text;
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    purchase_orders::{
        entities::{PurchaseOrder, PurchaseOrderStatus, items_total_cents},
        requests::{
            CreatePurchaseOrderRequest, PurchaseOrderListParams, UpdatePurchaseOrderRequest,
        },
        responses::PurchaseOrderListResponse,
    },
};
use crate::utils::random_code::record_number;
use crate::utils::sql::contains_term;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_purchase_order_impl(
        &self,
        created_by: i64,
        req: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrder> {
        let now = now_ts();
        let status = req.status.unwrap_or(PurchaseOrderStatus::Draft);
        let total_cents = req
            .total_cents
            .unwrap_or_else(|| items_total_cents(&req.items));

        let model = ActiveModel {
            po_number: Set(record_number("PO")),
            supplier_name: Set(req.supplier_name),
            supplier_reference: Set(req.supplier_reference),
            status: Set(status.to_string()),
            total_cents: Set(total_cents),
            currency: Set(req.currency.unwrap_or_else(|| "EUR".to_string())),
            expected_at: Set(req.expected_at.map(|d| d.timestamp())),
            received_at: Set((status == PurchaseOrderStatus::Received).then_some(now)),
            items: Set(Some(to_json_text(&req.items))),
            notes: Set(req.notes),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建采购单失败: {e}")))?;

        Ok(result.into_purchase_order())
    }

    pub async fn get_purchase_order_by_id_impl(&self, id: i64) -> Result<Option<PurchaseOrder>> {
        let result = PurchaseOrders::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询采购单失败: {e}")))?;

        Ok(result.map(|m| m.into_purchase_order()))
    }

    pub async fn list_purchase_orders_with_pagination_impl(
        &self,
        query: PurchaseOrderListParams,
    ) -> Result<PurchaseOrderListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = PurchaseOrders::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref supplier) = query.supplier
            && !supplier.trim().is_empty()
        {
            select = select.filter(contains_term(Column::SupplierName, supplier.trim()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询采购单总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询采购单页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询采购单列表失败: {e}")))?;

        Ok(PurchaseOrderListResponse {
            items: items.into_iter().map(|m| m.into_purchase_order()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新采购单。只改明细不传金额时重新按明细合计
    pub async fn update_purchase_order_impl(
        &self,
        id: i64,
        update: UpdatePurchaseOrderRequest,
    ) -> Result<Option<PurchaseOrder>> {
        let Some(existing) = self.get_purchase_order_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(supplier_name) = update.supplier_name {
            model.supplier_name = Set(supplier_name);
        }
        if let Some(reference) = update.supplier_reference {
            model.supplier_reference = Set(Some(reference));
        }
        if let Some(currency) = update.currency {
            model.currency = Set(currency);
        }
        if let Some(expected_at) = update.expected_at {
            model.expected_at = Set(Some(expected_at.timestamp()));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }

        match (update.total_cents, update.items) {
            (Some(total), items) => {
                model.total_cents = Set(total);
                if let Some(items) = items {
                    model.items = Set(Some(to_json_text(&items)));
                }
            }
            (None, Some(items)) => {
                model.total_cents = Set(items_total_cents(&items));
                model.items = Set(Some(to_json_text(&items)));
            }
            (None, None) => {}
        }

        if let Some(status) = update.status
            && status != existing.status
        {
            model.status = Set(status.to_string());
            if status == PurchaseOrderStatus::Received && existing.received_at.is_none() {
                model.received_at = Set(Some(now));
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新采购单失败: {e}")))?;

        self.get_purchase_order_by_id_impl(id).await
    }

    pub async fn delete_purchase_order_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = PurchaseOrders::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除采购单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::purchase_orders::entities::PurchaseOrderItem;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::users::tests::seed_user;

    #[tokio::test]
    async fn test_purchase_order_totals_and_receive() {
        let storage = SeaOrmStorage::in_memory().await;
        let buyer = seed_user(&storage, "inkoper", UserRole::Admin).await;

        let po = storage
            .create_purchase_order_impl(
                buyer.id,
                CreatePurchaseOrderRequest {
                    supplier_name: "Vintage Wholesale BV".into(),
                    supplier_reference: None,
                    status: None,
                    total_cents: None,
                    currency: None,
                    expected_at: None,
                    items: vec![PurchaseOrderItem {
                        description: "Denim jackets".into(),
                        sku: None,
                        quantity: 10,
                        received_quantity: 0,
                        unit_cost_cents: 1500,
                    }],
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert!(po.po_number.starts_with("PO-"));
        assert_eq!(po.total_cents, 15000);
        assert_eq!(po.status, PurchaseOrderStatus::Draft);

        let received = storage
            .update_purchase_order_impl(
                po.id,
                UpdatePurchaseOrderRequest {
                    status: Some(PurchaseOrderStatus::Received),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(received.received_at.is_some());
        assert_eq!(received.total_cents, 15000);

        let list = storage
            .list_purchase_orders_with_pagination_impl(PurchaseOrderListParams {
                pagination: Default::default(),
                status: None,
                supplier: Some("wholesale".into()),
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
    }
}
