use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use super::{is_running, run_sync};
use crate::config::AppConfig;
use crate::storage::Storage;

/// 定时同步。未配置 Shopify 或间隔为 0 时不启动，返回 false
pub fn start_scheduler(storage: Arc<dyn Storage>) -> bool {
    let config = &AppConfig::get().shopify;
    if !config.is_configured() {
        info!("Shopify is not configured, scheduled sync disabled");
        return false;
    }
    if config.sync_interval_secs == 0 {
        info!("Shopify sync interval is 0, scheduled sync disabled");
        return false;
    }

    let period = Duration::from_secs(config.sync_interval_secs);
    info!("Scheduled Shopify sync every {}s", period.as_secs());

    actix_web::rt::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if is_running() {
                debug!("Previous Shopify sync still running, skipping tick");
                continue;
            }
            if let Err(e) = run_sync(storage.clone()).await {
                warn!("Scheduled Shopify sync failed: {}", e);
            }
        }
    });

    true
}
