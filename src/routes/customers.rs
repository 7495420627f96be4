use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::customers::requests::{
    CreateCustomerRequest, CustomerListParams, UpdateCustomerRequest,
};
use crate::services::CustomerService;
use crate::utils::SafeIDI64;

static CUSTOMER_SERVICE: Lazy<CustomerService> = Lazy::new(CustomerService::new_lazy);

pub async fn list_customers(
    req: HttpRequest,
    query: web::Query<CustomerListParams>,
) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE
        .list_customers(&req, query.into_inner())
        .await
}

pub async fn get_customer(req: HttpRequest, customer_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE.get_customer(&req, customer_id.0).await
}

pub async fn create_customer(
    req: HttpRequest,
    customer_data: web::Json<CreateCustomerRequest>,
) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE
        .create_customer(&req, customer_data.into_inner())
        .await
}

pub async fn update_customer(
    req: HttpRequest,
    customer_id: SafeIDI64,
    update_data: web::Json<UpdateCustomerRequest>,
) -> ActixResult<HttpResponse> {
    CUSTOMER_SERVICE
        .update_customer(&req, customer_id.0, update_data.into_inner())
        .await
}

// 配置路由
pub fn configure_customer_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/customers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_customers))
                    .route(web::post().to(create_customer).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_customer))
                    .route(web::put().to(update_customer).wrap(staff_only())),
            ),
    );
}
