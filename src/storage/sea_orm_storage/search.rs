use super::SeaOrmStorage;
use crate::entity::{customers, email_threads, orders, repairs, returns};
use crate::errors::{Result, ThriftHubError};
use crate::models::search::SearchResponse;
use crate::utils::sql::any_contains;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

impl SeaOrmStorage {
    /// 全局搜索，每类最多 limit 条
    pub async fn search_impl(
        &self,
        term: &str,
        order_digits: &[String],
        limit: u64,
    ) -> Result<SearchResponse> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(SearchResponse::default());
        }

        let customers = customers::Entity::find()
            .filter(any_contains(
                &[
                    customers::Column::Email,
                    customers::Column::FirstName,
                    customers::Column::LastName,
                    customers::Column::Phone,
                ],
                term,
            ))
            .order_by_desc(customers::Column::UpdatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("搜索客户失败: {e}")))?;

        // 订单号按数字结尾匹配，兼容 `#1001`、`DT1001` 等写法
        let order_condition = order_digits.iter().fold(
            any_contains(
                &[
                    orders::Column::OrderNumber,
                    orders::Column::CustomerEmail,
                    orders::Column::CustomerName,
                ],
                term,
            ),
            |cond, digits| cond.add(orders::Column::OrderNumber.ends_with(digits.as_str())),
        );
        let orders = orders::Entity::find()
            .filter(orders::Column::DeletedAt.is_null())
            .filter(order_condition)
            .order_by_desc(orders::Column::OrderedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("搜索订单失败: {e}")))?;

        let returns = returns::Entity::find()
            .filter(returns::Column::DeletedAt.is_null())
            .filter(any_contains(
                &[
                    returns::Column::ReturnNumber,
                    returns::Column::TrackingNumber,
                    returns::Column::Reason,
                ],
                term,
            ))
            .order_by_desc(returns::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("搜索退货失败: {e}")))?;

        let repairs = repairs::Entity::find()
            .filter(repairs::Column::DeletedAt.is_null())
            .filter(any_contains(
                &[
                    repairs::Column::RepairNumber,
                    repairs::Column::ProductName,
                    repairs::Column::SerialNumber,
                    repairs::Column::CustomerName,
                    repairs::Column::CustomerEmail,
                ],
                term,
            ))
            .order_by_desc(repairs::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("搜索维修失败: {e}")))?;

        let email_threads = email_threads::Entity::find()
            .filter(any_contains(
                &[
                    email_threads::Column::Subject,
                    email_threads::Column::ParticipantEmail,
                    email_threads::Column::ParticipantName,
                ],
                term,
            ))
            .order_by_desc(email_threads::Column::LastMessageAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ThriftHubError::database_operation(format!("搜索邮件会话失败: {e}")))?;

        Ok(SearchResponse {
            customers: customers.into_iter().map(|m| m.into_customer()).collect(),
            orders: orders.into_iter().map(|m| m.into_order()).collect(),
            returns: returns.into_iter().map(|m| m.into_return()).collect(),
            repairs: repairs.into_iter().map(|m| m.into_repair()).collect(),
            email_threads: email_threads.into_iter().map(|m| m.into_thread()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customers::requests::CreateCustomerRequest;
    use crate::storage::sea_orm_storage::orders::tests::order_request;

    #[tokio::test]
    async fn test_search_across_records() {
        let storage = SeaOrmStorage::in_memory().await;
        storage
            .create_customer_impl(CreateCustomerRequest {
                email: Some("marieke@example.nl".into()),
                first_name: Some("Marieke".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        storage.create_order_impl(order_request("#1042")).await.unwrap();
        storage.create_order_impl(order_request("#2042")).await.unwrap();

        let hits = storage.search_impl("marieke", &[], 10).await.unwrap();
        assert_eq!(hits.customers.len(), 1);
        assert!(hits.orders.is_empty());

        // "order 1042" 本身不出现在任何字段里，靠数字匹配
        let hits = storage
            .search_impl("order 1042", &["1042".to_string()], 10)
            .await
            .unwrap();
        assert_eq!(hits.orders.len(), 1);
        assert_eq!(hits.orders[0].order_number, "#1042");

        let hits = storage.search_impl("042", &[], 1).await.unwrap();
        assert_eq!(hits.orders.len(), 1);

        assert!(storage.search_impl("   ", &[], 10).await.unwrap().orders.is_empty());
    }
}
