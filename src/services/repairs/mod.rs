pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::repairs::requests::{
    CreateRepairRequest, RepairListParams, UpdateRepairRequest, UpdateRepairStatusRequest,
};
use crate::storage::Storage;

pub struct RepairService {
    storage: Option<Arc<dyn Storage>>,
}

impl RepairService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn list_repairs(
        &self,
        request: &HttpRequest,
        query: RepairListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_repairs(self, request, query).await
    }

    pub async fn get_repair(&self, request: &HttpRequest, repair_id: i64) -> ActixResult<HttpResponse> {
        get::get_repair(self, request, repair_id).await
    }

    pub async fn create_repair(
        &self,
        request: &HttpRequest,
        repair_data: CreateRepairRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_repair(self, request, repair_data).await
    }

    pub async fn update_repair(
        &self,
        request: &HttpRequest,
        repair_id: i64,
        update_data: UpdateRepairRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_repair(self, request, repair_id, update_data).await
    }

    pub async fn update_repair_status(
        &self,
        request: &HttpRequest,
        repair_id: i64,
        status_data: UpdateRepairStatusRequest,
    ) -> ActixResult<HttpResponse> {
        let update_data = UpdateRepairRequest {
            status: Some(status_data.status),
            ..Default::default()
        };
        update::update_repair(self, request, repair_id, update_data).await
    }

    pub async fn delete_repair(
        &self,
        request: &HttpRequest,
        repair_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_repair(self, request, repair_id).await
    }
}
