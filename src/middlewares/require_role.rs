/*!
 * 基于角色的访问控制中间件
 *
 * 必须放在 RequireJWT 之后（actix 中 `.wrap` 越靠后越先执行，所以写在 RequireJWT 之前）。
 *
 * ```rust,ignore
 * web::scope("/api/v1/users")
 *     .wrap(RequireRole::new_any(UserRole::admin_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * 也可以只包住单个路由：
 *
 * ```rust,ignore
 * .route("", web::post().to(create_order).wrap(RequireRole::new_any(UserRole::staff_roles())))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

#[derive(Clone)]
pub struct RequireRole {
    allowed: Rc<[UserRole]>,
}

impl RequireRole {
    pub fn new(role: UserRole) -> Self {
        Self {
            allowed: Rc::from([role]),
        }
    }

    /// 任一角色即可
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| **r).collect(),
        }
    }

    fn permits(allowed: &[UserRole], role: UserRole) -> bool {
        allowed.contains(&role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed: self.allowed.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let allowed = self.allowed.clone();

        Box::pin(async move {
            let caller = req.extensions().get::<User>().map(|u| (u.id, u.role));

            match caller {
                Some((_, role)) if RequireRole::permits(&allowed, role) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} (role: {}) on {}. Allowed roles: {:?}",
                        user_id,
                        role,
                        req.path(),
                        allowed
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check on {} without an authenticated user", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, web};

    fn user_with_role(role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "tester".into(),
            email: "tester@dutchthrift.nl".into(),
            password_hash: String::new(),
            role,
            status: crate::models::users::entities::UserStatus::Active,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_permits() {
        let gate = RequireRole::new_any(UserRole::staff_roles());
        assert!(RequireRole::permits(&gate.allowed, UserRole::Agent));
        assert!(!RequireRole::permits(&gate.allowed, UserRole::Viewer));
    }

    #[actix_web::test]
    async fn test_viewer_forbidden_agent_allowed() {
        for (role, expected) in [
            (UserRole::Viewer, StatusCode::FORBIDDEN),
            (UserRole::Agent, StatusCode::OK),
        ] {
            let app = actix_web::test::init_service(
                App::new().service(
                    web::resource("/orders")
                        .wrap(RequireRole::new_any(UserRole::staff_roles()))
                        .wrap_fn(move |req, srv| {
                            req.extensions_mut().insert(user_with_role(role));
                            actix_service::Service::call(srv, req)
                        })
                        .route(web::post().to(HttpResponse::Ok)),
                ),
            )
            .await;
            let resp = actix_web::test::call_service(
                &app,
                actix_web::test::TestRequest::post().uri("/orders").to_request(),
            )
            .await;
            assert_eq!(resp.status(), expected);
        }
    }
}
