pub mod create;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::customers::requests::{
    CreateCustomerRequest, CustomerListParams, UpdateCustomerRequest,
};
use crate::storage::Storage;

pub struct CustomerService {
    storage: Option<Arc<dyn Storage>>,
}

impl CustomerService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_customers(
        &self,
        request: &HttpRequest,
        query: CustomerListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_customers(self, request, query).await
    }

    // 客户详情，附带订单
    pub async fn get_customer(
        &self,
        request: &HttpRequest,
        customer_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_customer(self, request, customer_id).await
    }

    pub async fn create_customer(
        &self,
        request: &HttpRequest,
        customer_data: CreateCustomerRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_customer(self, request, customer_data).await
    }

    pub async fn update_customer(
        &self,
        request: &HttpRequest,
        customer_id: i64,
        update_data: UpdateCustomerRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_customer(self, request, customer_id, update_data).await
    }
}

/// 规范化可选邮箱：去空白、转小写，空串视为未填
pub(crate) fn normalize_optional_email(
    email: Option<String>,
) -> Result<Option<String>, &'static str> {
    match email.map(|e| e.trim().to_lowercase()) {
        Some(e) if e.is_empty() => Ok(None),
        Some(e) => crate::utils::validate::validate_email(&e).map(|_| Some(e)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_optional_email;

    #[test]
    fn test_normalize_optional_email() {
        assert_eq!(
            normalize_optional_email(Some("  Anna@Example.NL ".into())),
            Ok(Some("anna@example.nl".into()))
        );
        assert_eq!(normalize_optional_email(Some("   ".into())), Ok(None));
        assert_eq!(normalize_optional_email(None), Ok(None));
        assert!(normalize_optional_email(Some("not-an-email".into())).is_err());
    }
}
