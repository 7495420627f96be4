use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EmailThreadService, inbox, load_thread};
use crate::models::ApiResponse;
use crate::models::email_threads::responses::AutoLinkResponse;
use crate::services::{mail_extractor, storage_failure};

/// 重新提取并自动关联，已有关联不会被覆盖
pub async fn auto_link_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let thread = match load_thread(storage.as_ref(), thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };

    match inbox::auto_link(storage.as_ref(), mail_extractor(), &thread).await {
        Ok((thread, plan)) => {
            let message = if plan.changed {
                "Email thread linked"
            } else {
                "No new links found"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AutoLinkResponse { thread, plan },
                message,
            )))
        }
        Err(e) => Ok(storage_failure("Auto-link email thread", &e)),
    }
}

/// 从主题和入站邮件正文中提取订单号、姓名、电话等
pub async fn extract_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let thread = match load_thread(storage.as_ref(), thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };

    match inbox::extract_thread_info(storage.as_ref(), mail_extractor(), &thread).await {
        Ok(info) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            info,
            "Information extracted",
        ))),
        Err(e) => Ok(storage_failure("Extract email thread", &e)),
    }
}
