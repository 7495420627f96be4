use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, ErrorCode, PaginationQuery,
    cases::{entities::CaseStatus, requests::CaseListParams},
    email_threads::{entities::ThreadStatus, requests::ThreadListParams},
    repairs::{entities::RepairStatus, requests::RepairListParams},
    todos::{entities::TodoStatus, requests::TodoListParams},
    users::responses::{UserDetailResponse, UserWorkload},
};
use crate::services::storage_failure;
use crate::storage::Storage;

// 只需要 total，取一条即可
fn count_page() -> PaginationQuery {
    PaginationQuery { page: 1, size: 1 }
}

async fn load_workload(storage: &dyn Storage, user_id: i64) -> Result<UserWorkload> {
    let mut workload = UserWorkload::default();

    for status in [TodoStatus::Todo, TodoStatus::InProgress] {
        let params = TodoListParams {
            pagination: count_page(),
            status: Some(status),
            scope: None,
            assignee_id: Some(user_id),
            search: None,
        };
        workload.open_todos += storage
            .list_todos_with_pagination(params, None)
            .await?
            .pagination
            .total;
    }

    for status in [ThreadStatus::Open, ThreadStatus::Pending] {
        let params = ThreadListParams {
            pagination: count_page(),
            status: Some(status),
            is_read: None,
            assigned_to: Some(user_id),
            search: None,
        };
        workload.open_threads += storage
            .list_threads_with_pagination(params)
            .await?
            .pagination
            .total;
    }

    for status in RepairStatus::ALL.iter().filter(|s| !s.is_terminal()) {
        let params = RepairListParams {
            pagination: count_page(),
            status: Some(*status),
            assigned_to: Some(user_id),
            order_id: None,
            search: None,
        };
        workload.active_repairs += storage
            .list_repairs_with_pagination(params)
            .await?
            .pagination
            .total;
    }

    for status in CaseStatus::ALL.iter().filter(|s| !s.is_closed()) {
        let params = CaseListParams {
            pagination: count_page(),
            status: Some(*status),
            assigned_to: Some(user_id),
            customer_id: None,
            search: None,
        };
        workload.open_cases += storage
            .list_cases_with_pagination(params)
            .await?
            .pagination
            .total;
    }

    Ok(workload)
}

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(ApiResponse::not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(storage_failure("Get user", &e)),
    };

    match load_workload(storage.as_ref(), user.id).await {
        Ok(workload) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserDetailResponse { user, workload },
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("Load user workload", &e)),
    }
}
