use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::Result;
use crate::models::{
    ApiResponse, PaginationQuery,
    users::{
        entities::{User, UserStatus},
        requests::UserListParams,
        responses::AssignableUser,
    },
};
use crate::services::storage_failure;
use crate::storage::Storage;

pub async fn list_users(
    service: &UserService,
    mut query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    query.search = query
        .search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let storage = service.get_storage(request)?;
    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "User list retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List users", &e)),
    }
}

async fn active_users(storage: &dyn Storage) -> Result<Vec<User>> {
    let mut users = Vec::new();
    let mut page = 1;
    loop {
        let params = UserListParams {
            pagination: PaginationQuery { page, size: 100 },
            role: None,
            status: Some(UserStatus::Active),
            search: None,
        };
        let response = storage.list_users_with_pagination(params).await?;
        let last_page = response.items.is_empty() || page >= response.pagination.total_pages;
        users.extend(response.items);
        if last_page {
            return Ok(users);
        }
        page += 1;
    }
}

/// 可被指派工作的同事：在职且非只读
pub(crate) fn assignable(users: &[User]) -> Vec<AssignableUser> {
    let mut list: Vec<AssignableUser> = users
        .iter()
        .filter(|u| u.status == UserStatus::Active && u.can_write())
        .map(AssignableUser::from)
        .collect();
    list.sort_by_key(|u| {
        u.display_name
            .clone()
            .unwrap_or_else(|| u.username.clone())
            .to_lowercase()
    });
    list
}

pub async fn list_assignable_users(
    service: &UserService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match active_users(storage.as_ref()).await {
        Ok(users) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignable(&users),
            "Assignable users retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure("List assignable users", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn user(id: i64, name: &str, role: UserRole, status: UserStatus) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: name.to_string(),
            email: format!("{name}@dutchthrift.nl"),
            password_hash: String::new(),
            role,
            status,
            display_name: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_assignable_skips_viewers_and_inactive() {
        let mut mark = user(3, "mark", UserRole::Agent, UserStatus::Active);
        mark.display_name = Some("Anouk".into());
        let users = vec![
            user(1, "sanne", UserRole::Admin, UserStatus::Active),
            user(2, "joost", UserRole::Viewer, UserStatus::Active),
            mark,
            user(4, "pim", UserRole::Agent, UserStatus::Inactive),
        ];

        let ids: Vec<i64> = assignable(&users).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }
}
