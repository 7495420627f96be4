pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::purchase_orders::entities::PurchaseOrderItem;
use crate::models::purchase_orders::requests::{
    CreatePurchaseOrderRequest, PurchaseOrderListParams, UpdatePurchaseOrderRequest,
    UpdatePurchaseOrderStatusRequest,
};
use crate::storage::Storage;

pub struct PurchaseOrderService {
    storage: Option<Arc<dyn Storage>>,
}

impl PurchaseOrderService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_purchase_orders(
        &self,
        request: &HttpRequest,
        query: PurchaseOrderListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_purchase_orders(self, request, query).await
    }

    pub async fn get_purchase_order(
        &self,
        request: &HttpRequest,
        po_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_purchase_order(self, request, po_id).await
    }

    pub async fn create_purchase_order(
        &self,
        request: &HttpRequest,
        po_data: CreatePurchaseOrderRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_purchase_order(self, request, po_data).await
    }

    pub async fn update_purchase_order(
        &self,
        request: &HttpRequest,
        po_id: i64,
        update_data: UpdatePurchaseOrderRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_purchase_order(self, request, po_id, update_data).await
    }

    pub async fn update_purchase_order_status(
        &self,
        request: &HttpRequest,
        po_id: i64,
        status_data: UpdatePurchaseOrderStatusRequest,
    ) -> ActixResult<HttpResponse> {
        let update_data = UpdatePurchaseOrderRequest {
            status: Some(status_data.status),
            ..Default::default()
        };
        update::update_purchase_order(self, request, po_id, update_data).await
    }

    pub async fn delete_purchase_order(
        &self,
        request: &HttpRequest,
        po_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_purchase_order(self, request, po_id).await
    }
}

/// 明细行校验：数量、单价不能为负，已收数量不能超过订购数量
pub(crate) fn validate_items(items: &[PurchaseOrderItem]) -> Result<(), &'static str> {
    for item in items {
        if item.description.trim().is_empty() {
            return Err("Item description is required");
        }
        if item.quantity < 0 || item.unit_cost_cents < 0 || item.received_quantity < 0 {
            return Err("Item quantity and cost cannot be negative");
        }
        if item.received_quantity > item.quantity {
            return Err("Received quantity cannot exceed ordered quantity");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: i64, received_quantity: i64) -> PurchaseOrderItem {
        PurchaseOrderItem {
            description: "Canon AE-1 body".into(),
            sku: None,
            quantity,
            received_quantity,
            unit_cost_cents: 4500,
        }
    }

    #[test]
    fn test_validate_items() {
        assert!(validate_items(&[item(2, 1)]).is_ok());
        assert!(validate_items(&[item(1, 2)]).is_err());
        assert!(validate_items(&[item(-1, 0)]).is_err());
        let mut blank = item(1, 0);
        blank.description = "  ".into();
        assert!(validate_items(&[blank]).is_err());
    }
}
