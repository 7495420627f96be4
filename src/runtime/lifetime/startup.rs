use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, ThriftHubError};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::services::sync;
use crate::storage::Storage;
use crate::utils::password::{generate_password, hash_password};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 默认管理员用户名
const ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 依次尝试的缓存后端：配置值在前，moka 兜底
fn cache_candidates(configured: &str) -> Vec<&str> {
    if configured == "moka" {
        vec!["moka"]
    } else {
        vec![configured, "moka"]
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();

    for name in cache_candidates(cache_type) {
        let Some(constructor) = get_object_cache_plugin(name) else {
            warn!("Cache backend '{}' not found in registry", name);
            continue;
        };
        match constructor().await {
            Ok(cache) => {
                if name != cache_type {
                    warn!("Falling back to {} cache backend", name);
                }
                info!("Cache backend '{}' initialized", name);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", name, e),
        }
    }

    Err(ThriftHubError::cache_plugin_not_found(format!(
        "没有可用的缓存后端 (配置: {cache_type})"
    )))
}

/// 数据库中没有任何用户时创建默认管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No users found, creating default admin account"),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    // 优先使用环境变量中的密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD not set, generated admin password: {}", generated);
        warn!("  Store it now or set ADMIN_PASSWORD before first start");
        warn!("==========================================================");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        username: ADMIN_USERNAME.to_string(),
        email: format!("admin@{}", AppConfig::get().mail.message_id_host),
        password: password_hash,
        role: UserRole::Admin,
        display_name: Some("Administrator".to_string()),
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create admin account: {}", e),
    }
}

/// 准备服务器启动上下文：存储、迁移、默认管理员、缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache backends: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage().await?;
    info!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}

/// HTTP 服务就绪后启动的后台任务
pub fn start_background_tasks(context: &StartupContext) {
    if sync::start_scheduler(context.storage.clone()) {
        debug!("Shopify sync scheduler started");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_candidates_fall_back_to_moka() {
        assert_eq!(cache_candidates("redis"), vec!["redis", "moka"]);
        assert_eq!(cache_candidates("moka"), vec!["moka"]);
    }
}
