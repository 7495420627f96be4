use super::{SeaOrmStorage, now_ts};
use crate::entity::customers::{ActiveModel, Column, Entity as Customers};
use crate::errors::{Result, ThriftHubError};
use crate::models::{
    PaginationInfo,
    customers::{
        entities::Customer,
        requests::{CreateCustomerRequest, CustomerListParams, UpdateCustomerRequest},
        responses::CustomerListResponse,
    },
};
use crate::utils::sql::any_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

// 邮箱统一以小写存储，查找时大小写不敏感
fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

impl SeaOrmStorage {
    pub async fn create_customer_impl(&self, req: CreateCustomerRequest) -> Result<Customer> {
        let now = now_ts();

        let model = ActiveModel {
            external_id: Set(req.external_id),
            email: Set(normalize_email(req.email)),
            first_name: Set(req.first_name),
            last_name: Set(req.last_name),
            phone: Set(req.phone),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("创建客户失败: {e}")))?;

        Ok(result.into_customer())
    }

    pub async fn get_customer_by_id_impl(&self, id: i64) -> Result<Option<Customer>> {
        let result = Customers::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户失败: {e}")))?;

        Ok(result.map(|m| m.into_customer()))
    }

    pub async fn get_customer_by_external_id_impl(
        &self,
        external_id: &str,
    ) -> Result<Option<Customer>> {
        let result = Customers::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户失败: {e}")))?;

        Ok(result.map(|m| m.into_customer()))
    }

    pub async fn get_customer_by_email_impl(&self, email: &str) -> Result<Option<Customer>> {
        let Some(email) = normalize_email(Some(email.to_string())) else {
            return Ok(None);
        };

        let result = Customers::find()
            .filter(Column::Email.eq(email))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户失败: {e}")))?;

        Ok(result.map(|m| m.into_customer()))
    }

    pub async fn list_customers_with_pagination_impl(
        &self,
        query: CustomerListParams,
    ) -> Result<CustomerListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Customers::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(any_contains(
                &[
                    Column::Email,
                    Column::FirstName,
                    Column::LastName,
                    Column::Phone,
                ],
                search.trim(),
            ));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户页数失败: {e}")))?;
        let customers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("查询客户列表失败: {e}")))?;

        Ok(CustomerListResponse {
            items: customers.into_iter().map(|m| m.into_customer()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_customer_impl(
        &self,
        id: i64,
        update: UpdateCustomerRequest,
    ) -> Result<Option<Customer>> {
        if self.get_customer_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now_ts()),
            ..Default::default()
        };

        if let Some(external_id) = update.external_id {
            model.external_id = Set(Some(external_id));
        }
        if update.email.is_some() {
            model.email = Set(normalize_email(update.email));
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(Some(first_name));
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(Some(last_name));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("更新客户失败: {e}")))?;

        self.get_customer_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_customer_email_lookup_is_case_insensitive() {
        let storage = SeaOrmStorage::in_memory().await;
        let created = storage
            .create_customer_impl(CreateCustomerRequest {
                email: Some(" Jan.Jansen@Example.NL ".into()),
                first_name: Some("Jan".into()),
                last_name: Some("Jansen".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.email.as_deref(), Some("jan.jansen@example.nl"));

        let found = storage
            .get_customer_by_email_impl("JAN.JANSEN@example.nl")
            .await
            .unwrap();
        assert_eq!(found.map(|c| c.id), Some(created.id));
        assert!(storage.get_customer_by_email_impl("  ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_customer_search_and_update() {
        let storage = SeaOrmStorage::in_memory().await;
        let c = storage
            .create_customer_impl(CreateCustomerRequest {
                external_id: Some("7001".into()),
                email: Some("piet@example.nl".into()),
                first_name: Some("Piet".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let list = storage
            .list_customers_with_pagination_impl(CustomerListParams {
                pagination: Default::default(),
                search: Some("piet".into()),
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);

        let updated = storage
            .update_customer_impl(
                c.id,
                UpdateCustomerRequest {
                    phone: Some("+31612345678".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("+31612345678"));
        assert_eq!(updated.first_name.as_deref(), Some("Piet"));

        let by_ext = storage.get_customer_by_external_id_impl("7001").await.unwrap();
        assert_eq!(by_ext.map(|c| c.id), Some(c.id));
    }
}
