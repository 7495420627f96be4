pub mod runner;
pub mod scheduler;
pub mod status;
pub mod trigger;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::Storage;

pub use runner::{run_sync, sync_orders};
pub use scheduler::start_scheduler;

/// 进程内同步互斥锁，手动触发与定时任务共用
pub(crate) static SYNC_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// 当前是否有同步在运行
pub fn is_running() -> bool {
    SYNC_LOCK.try_lock().is_err()
}

pub struct SyncService {
    storage: Option<Arc<dyn Storage>>,
}

impl SyncService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn trigger_sync(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        trigger::trigger_sync(self, request).await
    }

    pub async fn sync_status(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        status::sync_status(self, request).await
    }
}
