use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::search::SearchParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{mail_extractor, storage_failure};
use crate::storage::Storage;

pub struct SearchService {
    storage: Option<Arc<dyn Storage>>,
}

/// 搜索词中的订单号数字。纯数字（可带 `#`）的搜索词本身也算
fn order_digits(term: &str) -> Vec<String> {
    let mut digits = mail_extractor().extract_order_numbers(term);
    let bare = term.trim_start_matches('#');
    if !bare.is_empty()
        && bare.chars().all(|c| c.is_ascii_digit())
        && !digits.iter().any(|d| d == bare)
    {
        digits.push(bare.to_string());
    }
    digits
}

impl SearchService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    pub async fn search(
        &self,
        request: &HttpRequest,
        query: SearchParams,
    ) -> ActixResult<HttpResponse> {
        let term = query.q.trim();
        if term.is_empty() {
            return Ok(ApiResponse::bad_request(
                ErrorCode::BadRequest,
                "Search term is required",
            ));
        }

        let storage = self.get_storage(request)?;
        let digits = order_digits(term);

        match storage.search(term, &digits, query.effective_limit()).await {
            Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                results,
                "Search completed",
            ))),
            Err(e) => Ok(storage_failure("Search", &e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_digits_from_term() {
        assert_eq!(order_digits("#1002"), vec!["1002".to_string()]);
        assert_eq!(order_digits("1002"), vec!["1002".to_string()]);
        assert!(order_digits("anna@example.nl").is_empty());
    }
}
