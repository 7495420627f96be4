use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("THRIFTHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("shopify.domain", std::env::var("SHOPIFY_DOMAIN").ok())?
            .set_override_option(
                "shopify.access_token",
                std::env::var("SHOPIFY_ACCESS_TOKEN").ok(),
            )?
            .set_override_option(
                "shopify.api_version",
                std::env::var("SHOPIFY_API_VERSION").ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        app_config.normalize();
        Ok(app_config)
    }

    /// 补全派生值并统一大小写
    fn normalize(&mut self) {
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers);
        }

        // Shopify REST 单页上限 250
        self.shopify.page_size = self.shopify.page_size.clamp(1, 250);
        self.shopify.domain = self
            .shopify
            .domain
            .trim()
            .trim_start_matches("https://")
            .trim_end_matches('/')
            .to_string();

        self.mail.own_addresses = self
            .mail
            .own_addresses
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();
        self.mail.order_prefixes = self
            .mail
            .order_prefixes
            .iter()
            .map(|p| p.trim().to_uppercase())
            .filter(|p| !p.is_empty())
            .collect();

        for ext in &mut self.upload.allowed_types {
            let lower = ext.trim().to_lowercase();
            *ext = if lower.starts_with('.') {
                lower
            } else {
                format!(".{lower}")
            };
        }
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_without_sources() {
        let config: AppConfig = Config::builder()
            .build()
            .and_then(|c| c.try_deserialize())
            .expect("empty config should fall back to defaults");
        assert_eq!(config.cache.cache_type, "moka");
        assert_eq!(config.shopify.page_size, 100);
        assert!(!config.shopify.is_configured());
        assert_eq!(config.mail.order_prefixes, vec!["DT".to_string()]);
    }

    #[test]
    fn test_normalize() {
        let mut config = AppConfig::default();
        config.server.max_workers = 2;
        config.shopify.page_size = 1000;
        config.shopify.domain = " https://dutchthrift.myshopify.com/ ".into();
        config.mail.own_addresses = vec![" Info@DutchThrift.nl ".into(), "".into()];
        config.mail.order_prefixes = vec!["dt".into()];
        config.upload.allowed_types = vec!["PDF".into(), ".png".into()];
        config.normalize();

        assert!(config.server.workers >= 1 && config.server.workers <= 2);
        assert_eq!(config.shopify.page_size, 250);
        assert_eq!(config.shopify.domain, "dutchthrift.myshopify.com");
        assert_eq!(config.mail.own_addresses, vec!["info@dutchthrift.nl"]);
        assert_eq!(config.mail.order_prefixes, vec!["DT"]);
        assert_eq!(config.upload.allowed_types, vec![".pdf", ".png"]);
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".into();
        config.server.port = 9000;
        assert_eq!(config.server_bind_address(), "0.0.0.0:9000");
    }
}
