pub mod pagination;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;

use ts_rs::TS;

define_string_enum! {
    // 优先级（维修、待办、工单共用）
    #[derive(TS, Default)]
    #[ts(export, export_to = "../frontend/src/types/generated/common.ts")]
    pub enum Priority {
        Low => "low",
        #[default]
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}
