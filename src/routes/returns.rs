use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::returns::requests::{
    CreateReturnRequest, ReturnListParams, UpdateReturnRequest, UpdateReturnStatusRequest,
};
use crate::services::ReturnService;
use crate::utils::SafeIDI64;

static RETURN_SERVICE: Lazy<ReturnService> = Lazy::new(ReturnService::new_lazy);

pub async fn list_returns(
    req: HttpRequest,
    query: web::Query<ReturnListParams>,
) -> ActixResult<HttpResponse> {
    RETURN_SERVICE.list_returns(&req, query.into_inner()).await
}

pub async fn get_return(req: HttpRequest, return_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RETURN_SERVICE.get_return(&req, return_id.0).await
}

pub async fn create_return(
    req: HttpRequest,
    return_data: web::Json<CreateReturnRequest>,
) -> ActixResult<HttpResponse> {
    RETURN_SERVICE
        .create_return(&req, return_data.into_inner())
        .await
}

pub async fn update_return(
    req: HttpRequest,
    return_id: SafeIDI64,
    update_data: web::Json<UpdateReturnRequest>,
) -> ActixResult<HttpResponse> {
    RETURN_SERVICE
        .update_return(&req, return_id.0, update_data.into_inner())
        .await
}

// 看板拖拽
pub async fn update_return_status(
    req: HttpRequest,
    return_id: SafeIDI64,
    status_data: web::Json<UpdateReturnStatusRequest>,
) -> ActixResult<HttpResponse> {
    RETURN_SERVICE
        .update_return_status(&req, return_id.0, status_data.into_inner())
        .await
}

pub async fn delete_return(req: HttpRequest, return_id: SafeIDI64) -> ActixResult<HttpResponse> {
    RETURN_SERVICE.delete_return(&req, return_id.0).await
}

// 配置路由
pub fn configure_returns_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/returns")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_returns))
                    .route(web::post().to(create_return).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_return))
                    .route(web::put().to(update_return).wrap(staff_only()))
                    .route(web::delete().to(delete_return).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(update_return_status).wrap(staff_only())),
            ),
    );
}
