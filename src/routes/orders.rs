use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::orders::requests::{CreateOrderRequest, OrderListParams, UpdateOrderRequest};
use crate::services::OrderService;
use crate::utils::SafeIDI64;

static ORDER_SERVICE: Lazy<OrderService> = Lazy::new(OrderService::new_lazy);

pub async fn list_orders(
    req: HttpRequest,
    query: web::Query<OrderListParams>,
) -> ActixResult<HttpResponse> {
    ORDER_SERVICE.list_orders(&req, query.into_inner()).await
}

pub async fn get_order(req: HttpRequest, order_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ORDER_SERVICE.get_order(&req, order_id.0).await
}

pub async fn create_order(
    req: HttpRequest,
    order_data: web::Json<CreateOrderRequest>,
) -> ActixResult<HttpResponse> {
    ORDER_SERVICE
        .create_order(&req, order_data.into_inner())
        .await
}

pub async fn update_order(
    req: HttpRequest,
    order_id: SafeIDI64,
    update_data: web::Json<UpdateOrderRequest>,
) -> ActixResult<HttpResponse> {
    ORDER_SERVICE
        .update_order(&req, order_id.0, update_data.into_inner())
        .await
}

pub async fn delete_order(req: HttpRequest, order_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ORDER_SERVICE.delete_order(&req, order_id.0).await
}

// 配置路由
pub fn configure_order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/orders")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_orders))
                    .route(web::post().to(create_order).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_order))
                    .route(web::put().to(update_order).wrap(staff_only()))
                    .route(web::delete().to(delete_order).wrap(staff_only())),
            ),
    );
}
