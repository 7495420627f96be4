pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::returns::requests::{
    CreateReturnRequest, ReturnListParams, UpdateReturnRequest, UpdateReturnStatusRequest,
};
use crate::storage::Storage;

pub struct ReturnService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReturnService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_returns(
        &self,
        request: &HttpRequest,
        query: ReturnListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_returns(self, request, query).await
    }

    pub async fn get_return(&self, request: &HttpRequest, return_id: i64) -> ActixResult<HttpResponse> {
        get::get_return(self, request, return_id).await
    }

    pub async fn create_return(
        &self,
        request: &HttpRequest,
        return_data: CreateReturnRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_return(self, request, return_data).await
    }

    pub async fn update_return(
        &self,
        request: &HttpRequest,
        return_id: i64,
        update_data: UpdateReturnRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_return(self, request, return_id, update_data).await
    }

    // 看板拖拽
    pub async fn update_return_status(
        &self,
        request: &HttpRequest,
        return_id: i64,
        status_data: UpdateReturnStatusRequest,
    ) -> ActixResult<HttpResponse> {
        let update_data = UpdateReturnRequest {
            status: Some(status_data.status),
            ..Default::default()
        };
        update::update_return(self, request, return_id, update_data).await
    }

    pub async fn delete_return(
        &self,
        request: &HttpRequest,
        return_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_return(self, request, return_id).await
    }
}
