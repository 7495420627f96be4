/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access_token>`，加载对应用户并放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/orders")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_orders))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 取得当前用户。
 * 已认证用户按 token 缓存，缓存时间取 access token 剩余有效期与 `cache.default_ttl` 的较小值。
 * 被停用的用户即使持有有效 token 也会被拒绝。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;
use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

fn cache_key(token: &str) -> String {
    format!("user:{token}")
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn authenticate(req: &ServiceRequest) -> Result<User, &'static str> {
    let token = bearer_token(req).ok_or("Missing or invalid Authorization header")?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid or expired token"
    })?;
    let user_id = claims.user_id().ok_or("Invalid token subject")?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(cache) = &cache
        && let CacheResult::Found(json) = cache.get_raw(&cache_key(token)).await
    {
        match serde_json::from_str::<User>(&json) {
            Ok(user) if user.id == user_id => return Ok(user),
            _ => cache.remove(&cache_key(token)).await,
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or("Storage unavailable")?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|err| {
            info!("Failed to load user {} for token: {}", user_id, err);
            "Failed to load user"
        })?
        .ok_or("User not found")?;

    if user.status != UserStatus::Active {
        return Err("User is not active");
    }

    if let Some(cache) = &cache
        && let Ok(json) = serde_json::to_string(&user)
    {
        let remaining = (claims.exp as i64 - chrono::Utc::now().timestamp()).max(1) as u64;
        let ttl = remaining.min(AppConfig::get().cache.default_ttl.max(1));
        cache.insert_raw(cache_key(token), json, ttl).await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // CORS 预检不带 token
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(reason) => {
                    info!("JWT authentication failed for {}: {}", req.path(), reason);
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {reason}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前登录用户，只在 RequireJWT 保护的路由中可用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role)
    }

    /// 登出或修改资料后清掉该 token 的用户缓存
    pub async fn invalidate_cached_user(req: &actix_web::HttpRequest) {
        let token = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            .map(str::trim);
        if let (Some(token), Some(cache)) = (token, req.app_data::<web::Data<Arc<dyn ObjectCache>>>())
        {
            cache.remove(&cache_key(token)).await;
        }
    }
}
