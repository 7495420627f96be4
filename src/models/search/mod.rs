use crate::models::customers::entities::Customer;
use crate::models::email_threads::entities::EmailThread;
use crate::models::orders::entities::Order;
use crate::models::repairs::entities::Repair;
use crate::models::returns::entities::Return;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_SEARCH_LIMIT: u64 = 10;
pub const MAX_SEARCH_LIMIT: u64 = 50;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/search.ts")]
pub struct SearchParams {
    pub q: String,
    pub limit: Option<u64>,
}

impl SearchParams {
    pub fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT)
    }
}

// 全局搜索结果，每类最多 limit 条
#[derive(Debug, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/search.ts")]
pub struct SearchResponse {
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub returns: Vec<Return>,
    pub repairs: Vec<Repair>,
    pub email_threads: Vec<EmailThread>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_bounds() {
        let p = |limit| SearchParams {
            q: "x".into(),
            limit,
        };
        assert_eq!(p(None).effective_limit(), 10);
        assert_eq!(p(Some(500)).effective_limit(), 50);
        assert_eq!(p(Some(0)).effective_limit(), 1);
    }
}
