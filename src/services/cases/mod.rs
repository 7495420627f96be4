pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::cases::requests::{
    CaseListParams, CreateCaseRequest, UpdateCaseRequest, UpdateCaseStatusRequest,
};
use crate::storage::Storage;

/// 客服工单
pub struct CaseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CaseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_cases(
        &self,
        request: &HttpRequest,
        query: CaseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_cases(self, request, query).await
    }

    pub async fn get_case(&self, request: &HttpRequest, case_id: i64) -> ActixResult<HttpResponse> {
        get::get_case(self, request, case_id).await
    }

    pub async fn create_case(
        &self,
        request: &HttpRequest,
        case_data: CreateCaseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_case(self, request, case_data).await
    }

    pub async fn update_case(
        &self,
        request: &HttpRequest,
        case_id: i64,
        update_data: UpdateCaseRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_case(self, request, case_id, update_data).await
    }

    pub async fn update_case_status(
        &self,
        request: &HttpRequest,
        case_id: i64,
        status_data: UpdateCaseStatusRequest,
    ) -> ActixResult<HttpResponse> {
        let update_data = UpdateCaseRequest {
            status: Some(status_data.status),
            ..Default::default()
        };
        update::update_case(self, request, case_id, update_data).await
    }

    pub async fn delete_case(&self, request: &HttpRequest, case_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_case(self, request, case_id).await
    }
}
