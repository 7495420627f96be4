use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::staff_only;
use crate::middlewares;
use crate::models::cases::requests::{
    CreateCaseRequest, CaseListParams, UpdateCaseRequest, UpdateCaseStatusRequest,
};
use crate::services::CaseService;
use crate::utils::SafeIDI64;

static CASE_SERVICE: Lazy<CaseService> = Lazy::new(CaseService::new_lazy);

pub async fn list_cases(
    req: HttpRequest,
    query: web::Query<CaseListParams>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE.list_cases(&req, query.into_inner()).await
}

pub async fn get_case(req: HttpRequest, case_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CASE_SERVICE.get_case(&req, case_id.0).await
}

pub async fn create_case(
    req: HttpRequest,
    case_data: web::Json<CreateCaseRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .create_case(&req, case_data.into_inner())
        .await
}

pub async fn update_case(
    req: HttpRequest,
    case_id: SafeIDI64,
    update_data: web::Json<UpdateCaseRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .update_case(&req, case_id.0, update_data.into_inner())
        .await
}

pub async fn update_case_status(
    req: HttpRequest,
    case_id: SafeIDI64,
    status_data: web::Json<UpdateCaseStatusRequest>,
) -> ActixResult<HttpResponse> {
    CASE_SERVICE
        .update_case_status(&req, case_id.0, status_data.into_inner())
        .await
}

pub async fn delete_case(req: HttpRequest, case_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CASE_SERVICE.delete_case(&req, case_id.0).await
}

// 配置路由
pub fn configure_cases_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/cases")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_cases))
                    .route(web::post().to(create_case).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_case))
                    .route(web::put().to(update_case).wrap(staff_only()))
                    .route(web::delete().to(delete_case).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/status")
                    .route(web::patch().to(update_case_status).wrap(staff_only())),
            ),
    );
}
