//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_thrifthub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ThriftHubError {
            $($variant(String),)*
        }

        impl ThriftHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ThriftHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ThriftHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ThriftHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ThriftHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ThriftHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_thrifthub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    ExternalService("E013", "External Service Error"),
    Conflict("E014", "Conflict"),
}

impl ThriftHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否由调用方输入导致（校验失败、资源不存在、冲突）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ThriftHubError::Validation(_)
                | ThriftHubError::NotFound(_)
                | ThriftHubError::Conflict(_)
        )
    }
}

impl fmt::Display for ThriftHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_simple())
    }
}

impl std::error::Error for ThriftHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ThriftHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        ThriftHubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ThriftHubError {
    fn from(err: std::io::Error) -> Self {
        ThriftHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ThriftHubError {
    fn from(err: serde_json::Error) -> Self {
        ThriftHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ThriftHubError {
    fn from(err: chrono::ParseError) -> Self {
        ThriftHubError::DateParse(err.to_string())
    }
}

impl From<reqwest::Error> for ThriftHubError {
    fn from(err: reqwest::Error) -> Self {
        ThriftHubError::ExternalService(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ThriftHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ThriftHubError::cache_connection("test").code(), "E001");
        assert_eq!(ThriftHubError::database_config("test").code(), "E003");
        assert_eq!(ThriftHubError::validation("test").code(), "E007");
        assert_eq!(ThriftHubError::external_service("test").code(), "E013");
        assert_eq!(ThriftHubError::conflict("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ThriftHubError::external_service("shopify down").error_type(),
            "External Service Error"
        );
        assert_eq!(
            ThriftHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_format_simple() {
        let err = ThriftHubError::not_found("Order #1001");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Order #1001"));
    }

    #[test]
    fn test_client_errors() {
        assert!(ThriftHubError::conflict("dup").is_client_error());
        assert!(ThriftHubError::validation("bad").is_client_error());
        assert!(!ThriftHubError::database_operation("locked").is_client_error());
    }

    #[test]
    fn test_from_serde_error() {
        let err: ThriftHubError = serde_json::from_str::<i64>("oops").unwrap_err().into();
        assert_eq!(err.code(), "E009");
    }
}
