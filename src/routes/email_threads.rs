use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{admin_only, staff_only};
use crate::middlewares;
use crate::models::email_threads::requests::{
    IngestEmailRequest, LinkThreadRequest, ReplyThreadRequest, ThreadListParams,
    UpdateThreadRequest,
};
use crate::services::EmailThreadService;
use crate::utils::SafeIDI64;

// 懒加载的全局 EmailThreadService 实例
static EMAIL_THREAD_SERVICE: Lazy<EmailThreadService> = Lazy::new(EmailThreadService::new_lazy);

pub async fn list_threads(
    req: HttpRequest,
    query: web::Query<ThreadListParams>,
) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .list_threads(&req, query.into_inner())
        .await
}

pub async fn get_thread(req: HttpRequest, thread_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE.get_thread(&req, thread_id.0).await
}

pub async fn ingest_message(
    req: HttpRequest,
    message: web::Json<IngestEmailRequest>,
) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .ingest_message(&req, message.into_inner())
        .await
}

pub async fn update_thread(
    req: HttpRequest,
    thread_id: SafeIDI64,
    update_data: web::Json<UpdateThreadRequest>,
) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .update_thread(&req, thread_id.0, update_data.into_inner())
        .await
}

pub async fn link_thread(
    req: HttpRequest,
    thread_id: SafeIDI64,
    link_data: web::Json<LinkThreadRequest>,
) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .link_thread(&req, thread_id.0, link_data.into_inner())
        .await
}

pub async fn auto_link_thread(req: HttpRequest, thread_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .auto_link_thread(&req, thread_id.0)
        .await
}

pub async fn extract_thread(req: HttpRequest, thread_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE.extract_thread(&req, thread_id.0).await
}

pub async fn reply_to_thread(
    req: HttpRequest,
    thread_id: SafeIDI64,
    reply_data: web::Json<ReplyThreadRequest>,
) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE
        .reply_to_thread(&req, thread_id.0, reply_data.into_inner())
        .await
}

pub async fn delete_thread(req: HttpRequest, thread_id: SafeIDI64) -> ActixResult<HttpResponse> {
    EMAIL_THREAD_SERVICE.delete_thread(&req, thread_id.0).await
}

// 配置路由
pub fn configure_email_thread_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/email-threads")
            .wrap(middlewares::RequireJWT)
            .service(web::resource("").route(web::get().to(list_threads)))
            // 邮件网关或导入脚本写入
            .service(
                web::resource("/ingest").route(web::post().to(ingest_message).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_thread))
                    .route(web::patch().to(update_thread).wrap(staff_only()))
                    .route(web::delete().to(delete_thread).wrap(admin_only())),
            )
            .service(web::resource("/{id}/extract").route(web::get().to(extract_thread)))
            .service(
                web::resource("/{id}/links").route(web::put().to(link_thread).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/auto-link")
                    .route(web::post().to(auto_link_thread).wrap(staff_only())),
            )
            .service(
                web::resource("/{id}/reply")
                    .route(web::post().to(reply_to_thread).wrap(staff_only())),
            ),
    );
}
