use super::{SeaOrmStorage, now_ts};
use crate::entity::repairs::{ActiveModel, Column, Entity as Repairs};
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    repairs::{
        entities::{Repair, RepairStatus},
        requests::{CreateRepairRequest, RepairListParams, UpdateRepairRequest},
        responses::RepairListResponse,
    },
};
use crate::utils::random_code::record_number;
use crate::utils::sql::any_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建维修单，客户信息缺失时从关联订单补全
    pub async fn create_repair_impl(&self, req: CreateRepairRequest) -> Result<Repair> {
        let now = now_ts();

        let mut customer_id = req.customer_id;
        let mut customer_name = req.customer_name;
        let mut customer_email = req.customer_email;
        let mut customer_phone = req.customer_phone;

        if let Some(order_id) = req.order_id
            && let Some(order) = self.get_order_by_id_impl(order_id).await?
        {
            customer_id = customer_id.or(order.customer_id);
            customer_name = customer_name.or(order.customer_name);
            customer_email = customer_email.or(order.customer_email);
            customer_phone = customer_phone.or(order.customer_phone);
        }

        let model = ActiveModel {
            repair_number: Set(record_number("REP")),
            order_id: Set(req.order_id),
            customer_id: Set(customer_id),
            customer_name: Set(customer_name),
            customer_email: Set(customer_email),
            customer_phone: Set(customer_phone),
            product_name: Set(req.product_name),
            serial_number: Set(req.serial_number),
            issue_description: Set(req.issue_description),
            status: Set(RepairStatus::New.to_string()),
            priority: Set(req.priority.unwrap_or_default().to_string()),
            assigned_to: Set(req.assigned_to),
            cost_cents: Set(req.cost_cents),
            completed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建维修单失败: {e}")))?;

        Ok(result.into_repair())
    }

    pub async fn get_repair_by_id_impl(&self, id: i64) -> Result<Option<Repair>> {
        let result = Repairs::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询维修单失败: {e}")))?;

        Ok(result.map(|m| m.into_repair()))
    }

    pub async fn list_repairs_by_order_impl(&self, order_id: i64) -> Result<Vec<Repair>> {
        let result = Repairs::find()
            .filter(Column::OrderId.eq(order_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询订单维修失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_repair()).collect())
    }

    pub async fn list_repairs_with_pagination_impl(
        &self,
        query: RepairListParams,
    ) -> Result<RepairListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Repairs::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(assigned_to) = query.assigned_to {
            select = select.filter(Column::AssignedTo.eq(assigned_to));
        }
        if let Some(order_id) = query.order_id {
            select = select.filter(Column::OrderId.eq(order_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[
                    Column::RepairNumber,
                    Column::ProductName,
                    Column::SerialNumber,
                    Column::CustomerName,
                    Column::CustomerEmail,
                ],
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
            .map_err(|e| ThriftHubError::database_operation(format!("查询维修总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询维修页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询维修列表失败: {e}")))?;

        Ok(RepairListResponse {
            items: items.into_iter().map(|m| m.into_repair()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_repair_impl(
        &self,
        id: i64,
        update: UpdateRepairRequest,
    ) -> Result<Option<Repair>> {
        let Some(existing) = self.get_repair_by_id_impl(id).await? else {
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
        if let Some(name) = update.customer_name {
            model.customer_name = Set(Some(name));
        }
        if let Some(email) = update.customer_email {
            model.customer_email = Set(Some(email));
        }
        if let Some(phone) = update.customer_phone {
            model.customer_phone = Set(Some(phone));
        }
        if let Some(product_name) = update.product_name {
            model.product_name = Set(product_name);
        }
        if let Some(serial_number) = update.serial_number {
            model.serial_number = Set(Some(serial_number));
        }
        if let Some(issue) = update.issue_description {
            model.issue_description = Set(issue);
        }
        if let Some(priority) = update.priority {
            model.priority = Set(priority.to_string());
        }
        if let Some(assigned_to) = update.assigned_to {
            model.assigned_to = Set(Some(assigned_to));
        }
        if let Some(cost_cents) = update.cost_cents {
            model.cost_cents = Set(Some(cost_cents));
        }

        if let Some(status) = update.status
            && status != existing.status
        {
            model.status = Set(status.to_string());
            if status.is_terminal() {
                model.completed_at = Set(Some(now));
            } else if existing.status.is_terminal() {
                model.completed_at = Set(None);
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新维修单失败: {e}")))?;

        self.get_repair_by_id_impl(id).await
    }

    pub async fn delete_repair_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = Repairs::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除维修单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Priority;
    use crate::storage::sea_orm_storage::orders::tests::order_request;

    fn repair_request(order_id: Option<i64>) -> CreateRepairRequest {
        CreateRepairRequest {
            order_id,
            customer_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            product_name: "Olympus OM-1".into(),
            serial_number: Some("1234567".into()),
            issue_description: "Sluiter blijft hangen".into(),
            priority: None,
            assigned_to: None,
            cost_cents: None,
        }
    }

    #[tokio::test]
    async fn test_create_repair_copies_order_contact() {
        let storage = SeaOrmStorage::in_memory().await;
        let order = storage.create_order_impl(order_request("#3001")).await.unwrap();

        let repair = storage
            .create_repair_impl(repair_request(Some(order.id)))
            .await
            .unwrap();
        assert!(repair.repair_number.starts_with("REP-"));
        assert_eq!(repair.status, RepairStatus::New);
        assert_eq!(repair.priority, Priority::Normal);
        assert_eq!(repair.customer_name.as_deref(), Some("Klaas Klant"));
        assert_eq!(repair.customer_email.as_deref(), Some("klant@example.nl"));
    }

    #[tokio::test]
    async fn test_repair_completion_stamp() {
        let storage = SeaOrmStorage::in_memory().await;
        let repair = storage.create_repair_impl(repair_request(None)).await.unwrap();

        let returned = storage
            .update_repair_impl(
                repair.id,
                UpdateRepairRequest {
                    status: Some(RepairStatus::Returned),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(returned.completed_at.is_some());

        let list = storage
            .list_repairs_with_pagination_impl(RepairListParams {
                pagination: Default::default(),
                status: Some(RepairStatus::Returned),
                assigned_to: None,
                order_id: None,
                search: Some("OM-1".into()),
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);

        assert!(storage.delete_repair_impl(repair.id).await.unwrap());
        assert!(storage.get_repair_by_id_impl(repair.id).await.unwrap().is_none());
    }
}
