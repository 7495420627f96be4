//! 邮件文本处理
//!
//! - `quote`: 拆分新回复与引用历史
//! - `html`: HTML 转纯文本
//! - `extract`: 提取订单号、电话、邮箱、姓名与物流单号
//! - `subject`: 主题归一化，用于归并会话

pub mod extract;
pub mod html;
pub mod quote;
pub mod subject;

pub use extract::{ExtractedInfo, Extractor};
pub use quote::{QuoteSplit, SplitMessage, split_html, split_message, split_plain};
pub use subject::normalize_subject;
