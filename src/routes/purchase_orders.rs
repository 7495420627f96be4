use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{admin_only, staff_only};
use crate::middlewares;
use crate::models::purchase_orders::requests::{
    CreatePurchaseOrderRequest, PurchaseOrderListParams, UpdatePurchaseOrderRequest,
    UpdatePurchaseOrderStatusRequest,
};
use crate::services::PurchaseOrderService;
use crate::utils::SafeIDI64;

static PURCHASE_ORDER_SERVICE: Lazy<PurchaseOrderService> =
    Lazy::new(PurchaseOrderService::new_lazy);

pub async fn list_purchase_orders(
    req: HttpRequest,
    query: web::Query<PurchaseOrderListParams>,
) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE.list_purchase_orders(&req, query.into_inner()).await
}

pub async fn get_purchase_order(req: HttpRequest, po_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE.get_purchase_order(&req, po_id.0).await
}

pub async fn create_purchase_order(
    req: HttpRequest,
    po_data: web::Json<CreatePurchaseOrderRequest>,
) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE
        .create_purchase_order(&req, po_data.into_inner())
        .await
}

pub async fn update_purchase_order(
    req: HttpRequest,
    po_id: SafeIDI64,
    update_data: web::Json<UpdatePurchaseOrderRequest>,
) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE
        .update_purchase_order(&req, po_id.0, update_data.into_inner())
        .await
}

pub async fn update_purchase_order_status(
    req: HttpRequest,
    po_id: SafeIDI64,
    status_data: web::Json<UpdatePurchaseOrderStatusRequest>,
) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE
        .update_purchase_order_status(&req, po_id.0, status_data.into_inner())
        .await
}

pub async fn delete_purchase_order(req: HttpRequest, po_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PURCHASE_ORDER_SERVICE.delete_purchase_order(&req, po_id.0).await
}

// 配置路由
pub fn configure_purchase_orders_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/purchase-orders")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_purchase_orders))
                    .route(
                        web::post()
                            .to(create_purchase_order)
                            .wrap(staff_only()),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_purchase_order))
                    .route(
                        web::put()
                            .to(update_purchase_order)
                            .wrap(staff_only()),
                    )
                    // 删除采购单仅限管理员
                    .route(
                        web::delete()
                            .to(delete_purchase_order)
                            .wrap(admin_only()),
                    ),
            )
            .service(
                web::resource("/{id}/status")
                    .route(
                        web::patch()
                            .to(update_purchase_order_status)
                            .wrap(staff_only()),
                    ),
            ),
    );
}
