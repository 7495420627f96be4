pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::orders::requests::{CreateOrderRequest, OrderListParams, UpdateOrderRequest};
use crate::storage::Storage;

pub struct OrderService {
    storage: Option<Arc<dyn Storage>>,
}

impl OrderService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_orders(
        &self,
        request: &HttpRequest,
        query: OrderListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_orders(self, request, query).await
    }

    // 订单详情，附带退货、维修和邮件会话
    pub async fn get_order(&self, request: &HttpRequest, order_id: i64) -> ActixResult<HttpResponse> {
        get::get_order(self, request, order_id).await
    }

    pub async fn create_order(
        &self,
        request: &HttpRequest,
        order_data: CreateOrderRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_order(self, request, order_data).await
    }

    pub async fn update_order(
        &self,
        request: &HttpRequest,
        order_id: i64,
        update_data: UpdateOrderRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_order(self, request, order_id, update_data).await
    }

    pub async fn delete_order(
        &self,
        request: &HttpRequest,
        order_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_order(self, request, order_id).await
    }
}
