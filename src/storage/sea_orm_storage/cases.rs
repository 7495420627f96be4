use super::{SeaOrmStorage, now_ts};
use crate::entity::cases::{ActiveModel, Column, Entity as Cases};
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    cases::{
        entities::{Case, CaseStatus},
        requests::{CaseListParams, CreateCaseRequest, UpdateCaseRequest},
        responses::CaseListResponse,
    },
};
use crate::utils::random_code::record_number;
use crate::utils::sql::any_contains;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_case_impl(&self, req: CreateCaseRequest) -> Result<Case> {
        let now = now_ts();

        let model = ActiveModel {
            case_number: Set(record_number("CASE")),
            title: Set(req.title),
            description: Set(req.description),
            status: Set(CaseStatus::Open.to_string()),
            priority: Set(req.priority.unwrap_or_default().to_string()),
            customer_id: Set(req.customer_id),
            order_id: Set(req.order_id),
            assigned_to: Set(req.assigned_to),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建工单失败: {e}")))?;

        Ok(result.into_case())
    }

    pub async fn get_case_by_id_impl(&self, id: i64) -> Result<Option<Case>> {
        let result = Cases::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询工单失败: {e}")))?;

        Ok(result.map(|m| m.into_case()))
    }

    pub async fn list_cases_with_pagination_impl(
        &self,
        query: CaseListParams,
    ) -> Result<CaseListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Cases::find().filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(assigned_to) = query.assigned_to {
            select = select.filter(Column::AssignedTo.eq(assigned_to));
        }
        if let Some(customer_id) = query.customer_id {
            select = select.filter(Column::CustomerId.eq(customer_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[Column::CaseNumber, Column::Title, Column::Description],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询工单总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询工单页数失败: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询工单列表失败: {e}")))?;

        Ok(CaseListResponse {
            items: items.into_iter().map(|m| m.into_case()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_case_impl(
        &self,
        id: i64,
        update: UpdateCaseRequest,
    ) -> Result<Option<Case>> {
        let Some(existing) = self.get_case_by_id_impl(id).await? else {
            return Ok(None);
        };

        let now = now_ts();
        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(priority) = update.priority {
            model.priority = Set(priority.to_string());
        }
        if let Some(customer_id) = update.customer_id {
            model.customer_id = Set(Some(customer_id));
        }
        if let Some(order_id) = update.order_id {
            model.order_id = Set(Some(order_id));
        }
        if let Some(assigned_to) = update.assigned_to {
            model.assigned_to = Set(Some(assigned_to));
        }

        if let Some(status) = update.status
            && status != existing.status
        {
            model.status = Set(status.to_string());
            if status.is_closed() {
                if !existing.status.is_closed() {
                    model.closed_at = Set(Some(now));
                }
            } else {
                model.closed_at = Set(None);
            }
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新工单失败: {e}")))?;

        self.get_case_by_id_impl(id).await
    }

    pub async fn delete_case_impl(&self, id: i64) -> Result<bool> {
        let now = now_ts();
        let result = Cases::update_many()
            .col_expr(Column::DeletedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("删除工单失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_case_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await;
        let case = storage
            .create_case_impl(CreateCaseRequest {
                title: "Pakket kwijt".into(),
                description: Some("Track & trace staat stil".into()),
                priority: None,
                customer_id: None,
                order_id: None,
                assigned_to: None,
            })
            .await
            .unwrap();
        assert!(case.case_number.starts_with("CASE-"));
        assert_eq!(case.status, CaseStatus::Open);

        let resolved = storage
            .update_case_impl(
                case.id,
                UpdateCaseRequest {
                    status: Some(CaseStatus::Resolved),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        let stamped = resolved.closed_at;
        assert!(stamped.is_some());

        // resolved -> closed 保留原关闭时间
        let closed = storage
            .update_case_impl(
                case.id,
                UpdateCaseRequest {
                    status: Some(CaseStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(closed.closed_at, stamped);

        let reopened = storage
            .update_case_impl(
                case.id,
                UpdateCaseRequest {
                    status: Some(CaseStatus::Open),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(reopened.closed_at.is_none());

        let search = storage
            .list_cases_with_pagination_impl(CaseListParams {
                pagination: Default::default(),
                status: None,
                assigned_to: None,
                customer_id: None,
                search: Some("trace".into()),
            })
            .await
            .unwrap();
        assert_eq!(search.pagination.total, 1);
    }
}
