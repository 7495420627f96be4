use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::repairs::requests::{
    CreateRepairRequest, RepairListParams, UpdateRepairRequest, UpdateRepairStatusRequest,
};
use crate::services::RepairService;
use crate::utils::SafeIDI64;

static REPAIR_SERVICE: Lazy<RepairService> = Lazy::new(RepairService::new_lazy);

pub async fn list_repairs(
    req: HttpRequest,
    query: web::Query<RepairListParams>,
) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE.list_repairs(&req, query.into_inner()).await
}

pub async fn get_repair(req: HttpRequest, repair_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE.get_repair(&req, repair_id.0).await
}

pub async fn create_repair(
    req: HttpRequest,
    repair_data: web::Json<CreateRepairRequest>,
) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE
        .create_repair(&req, repair_data.into_inner())
        .await
}

pub async fn update_repair(
    req: HttpRequest,
    repair_id: SafeIDI64,
    update_data: web::Json<UpdateRepairRequest>,
) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE
        .update_repair(&req, repair_id.0, update_data.into_inner())
        .await
}

pub async fn update_repair_status(
    req: HttpRequest,
    repair_id: SafeIDI64,
    status_data: web::Json<UpdateRepairStatusRequest>,
) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE
        .update_repair_status(&req, repair_id.0, status_data.into_inner())
        .await
}

pub async fn delete_repair(req: HttpRequest, repair_id: SafeIDI64) -> ActixResult<HttpResponse> {
    REPAIR_SERVICE.delete_repair(&req, repair_id.0).await
}

// 配置路由
pub fn configure_repairs_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/repairs")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_repairs))
                    .route(web::post().to(create_repair).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_repair))
                    .route(web::put().to(update_repair).wrap(staff_only()))
                    .route(web::delete().to(delete_repair).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(update_repair_status).wrap(staff_only())),
            ),
    );
}
