//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间统一存 unix 秒，金额存分，JSON 字段以文本存储。

pub mod prelude;

pub mod attachments;
pub mod cases;
pub mod customers;
pub mod email_messages;
pub mod email_threads;
pub mod notes;
pub mod orders;
pub mod purchase_orders;
pub mod repairs;
pub mod returns;
pub mod sync_states;
pub mod todos;
pub mod users;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn to_opt_datetime(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.map(to_datetime)
}

/// 解析 JSON 文本列，内容损坏时返回默认值
pub(crate) fn parse_json_or_default<T: DeserializeOwned + Default>(raw: Option<&str>) -> T {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| match serde_json::from_str(s) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Failed to parse JSON column: {e}");
                None
            }
        })
        .unwrap_or_default()
}

/// 序列化为 JSON 文本列
pub(crate) fn to_json_text<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_or_default() {
        let v: Vec<String> = parse_json_or_default(Some(r#"["3SABC12345678"]"#));
        assert_eq!(v, vec!["3SABC12345678".to_string()]);
        let v: Vec<String> = parse_json_or_default(Some("not json"));
        assert!(v.is_empty());
        let v: Vec<String> = parse_json_or_default(None);
        assert!(v.is_empty());
    }

    #[test]
    fn test_to_datetime() {
        assert_eq!(to_datetime(0).timestamp(), 0);
        assert_eq!(to_opt_datetime(Some(1_700_000_000)).map(|d| d.timestamp()), Some(1_700_000_000));
    }
}
