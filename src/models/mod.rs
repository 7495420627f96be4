//! 数据模型定义
//!
//! 业务实体、请求与响应结构，均通过 ts-rs 导出 TypeScript 类型供前端使用。

/// 定义以字符串存储的状态枚举
///
/// 自动生成：
/// - serde 重命名（数据库与 JSON 中使用同一个字符串）
/// - `as_str()` / `Display` / `FromStr`
/// - `ALL` 常量，按声明顺序列出全部取值
///
/// 调用方可以在枚举上附加额外的 derive 与属性（例如 `TS` 导出）。
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)*];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)*
                    _ => Err(format!("Invalid {}: {s}", stringify!($name))),
                }
            }
        }
    };
}

pub mod auth;
pub mod cases;
pub mod common;
pub mod customers;
pub mod email_threads;
pub mod files;
pub mod notes;
pub mod orders;
pub mod purchase_orders;
pub mod repairs;
pub mod returns;
pub mod search;
pub mod sync;
pub mod todos;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 业务错误码
///
/// 0 表示成功；4xx/5xx 段与 HTTP 语义对应；其余按业务模块分段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    Conflict = 409,
    RateLimitExceeded = 429,
    InternalServerError = 500,

    // 认证
    AuthFailed = 1000,

    // 用户
    UserNotFound = 2000,
    UserNameInvalid = 2001,
    UserEmailInvalid = 2002,
    UserPasswordInvalid = 2003,
    UserNameAlreadyExists = 2004,
    UserEmailAlreadyExists = 2005,
    UserCreationFailed = 2006,
    UserUpdateFailed = 2007,
    UserDeleteFailed = 2008,
    CanNotDeleteCurrentUser = 2009,

    // 文件
    FileNotFound = 3000,
    FileUploadFailed = 3001,
    FileTypeNotAllowed = 3002,
    FileSizeExceeded = 3003,
    MultifileUploadNotAllowed = 3004,

    // 业务记录
    CustomerNotFound = 4000,
    OrderNotFound = 4100,
    ReturnNotFound = 4200,
    RepairNotFound = 4300,
    TodoNotFound = 4400,
    TodoPermissionDenied = 4401,
    CaseNotFound = 4500,
    NoteNotFound = 4600,
    NotePermissionDenied = 4601,
    PurchaseOrderNotFound = 4700,
    EmailThreadNotFound = 4800,
    EmailMessageInvalid = 4801,

    // 同步
    SyncNotConfigured = 5000,
    SyncAlreadyRunning = 5001,
    SyncFailed = 5002,
}

#[cfg(test)]
mod tests {
    define_string_enum! {
        enum Sample {
            First => "first",
            SecondValue => "second_value",
        }
    }

    #[test]
    fn test_string_enum_roundtrip() {
        assert_eq!(Sample::SecondValue.as_str(), "second_value");
        assert_eq!("first".parse::<Sample>(), Ok(Sample::First));
        assert!("nope".parse::<Sample>().is_err());
        assert_eq!(Sample::ALL.len(), 2);
        assert_eq!(
            serde_json::to_string(&Sample::SecondValue).unwrap(),
            "\"second_value\""
        );
    }

    #[test]
    fn test_error_code_values() {
        assert_eq!(super::ErrorCode::Success as i32, 0);
        assert_eq!(super::ErrorCode::InternalServerError as i32, 500);
        assert_eq!(super::ErrorCode::SyncAlreadyRunning as i32, 5001);
    }
}
