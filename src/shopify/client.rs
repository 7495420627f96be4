use super::OrderSource;
use super::types::{OrdersEnvelope, OrdersPage};
use crate::config::ShopifyConfig;
use crate::errors::{Result, ThriftHubError};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{HeaderMap, HeaderValue, LINK};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ShopifyClient {
    client: reqwest::Client,
    config: ShopifyConfig,
}

impl ShopifyClient {
    pub fn new(config: ShopifyConfig) -> Result<Self> {
        if !config.is_configured() {
            return Err(ThriftHubError::validation(
                "Shopify domain and access token must both be set",
            ));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("thrifthub/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "https://{}/admin/api/{}/{}",
            self.config.domain, self.config.api_version, path
        )
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.config.access_token) {
            Ok(value) => {
                headers.insert("X-Shopify-Access-Token", value);
            }
            Err(err) => {
                warn!("Invalid Shopify access token header value: {}", err);
            }
        }
        headers
    }

    fn page_query(
        &self,
        updated_at_min: Option<DateTime<Utc>>,
        page_info: Option<&str>,
    ) -> Vec<(&'static str, String)> {
        let limit = self.config.page_size.clamp(1, 250).to_string();

        // 带游标翻页时 Shopify 只接受 limit 和 page_info
        if let Some(cursor) = page_info {
            return vec![("limit", limit), ("page_info", cursor.to_string())];
        }

        let mut query = vec![
            ("status", "any".to_string()),
            ("limit", limit),
            ("order", "updated_at asc".to_string()),
        ];
        if let Some(min) = updated_at_min {
            query.push((
                "updated_at_min",
                min.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        query
    }
}

#[async_trait::async_trait]
impl OrderSource for ShopifyClient {
    async fn fetch_orders_page(
        &self,
        updated_at_min: Option<DateTime<Utc>>,
        page_info: Option<&str>,
    ) -> Result<OrdersPage> {
        let response = self
            .client
            .get(self.endpoint("orders.json"))
            .headers(self.auth_headers())
            .query(&self.page_query(updated_at_min, page_info))
            .send()
            .await
            .map_err(|e| {
                ThriftHubError::external_service(format!("Shopify orders fetch failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(ThriftHubError::external_service(format!(
                "Shopify orders fetch failed ({status}): {body_text}"
            )));
        }

        let next_page_info = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page_info);

        let body = response.json::<OrdersEnvelope>().await.map_err(|e| {
            ThriftHubError::external_service(format!("Failed to parse Shopify orders response: {e}"))
        })?;

        debug!(
            "Fetched {} Shopify orders (has next page: {})",
            body.orders.len(),
            next_page_info.is_some()
        );

        Ok(OrdersPage {
            orders: body.orders,
            next_page_info,
        })
    }
}

/// 从 `Link` 头中取出 `rel="next"` 的 page_info
pub(crate) fn next_page_info(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|part| {
        let mut segments = part.split(';').map(str::trim);
        let url = segments
            .next()?
            .trim_start_matches('<')
            .trim_end_matches('>');
        let is_next = segments.any(|s| s.eq_ignore_ascii_case(r#"rel="next""#));
        if !is_next {
            return None;
        }
        reqwest::Url::parse(url)
            .ok()?
            .query_pairs()
            .find(|(k, _)| k == "page_info")
            .map(|(_, v)| v.into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShopifyClient {
        ShopifyClient::new(ShopifyConfig {
            domain: "dutchthrift.myshopify.com".into(),
            access_token: "shpat_test".into(),
            page_size: 50,
            ..ShopifyConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_next_page_info_from_link_header() {
        let header = r#"<https://dutchthrift.myshopify.com/admin/api/2024-10/orders.json?limit=50&page_info=prevCursor>; rel="previous", <https://dutchthrift.myshopify.com/admin/api/2024-10/orders.json?limit=50&page_info=nextCursor>; rel="next""#;
        assert_eq!(next_page_info(header).as_deref(), Some("nextCursor"));
    }

    #[test]
    fn test_no_next_page() {
        let header = r#"<https://dutchthrift.myshopify.com/admin/api/2024-10/orders.json?limit=50&page_info=prevCursor>; rel="previous""#;
        assert_eq!(next_page_info(header), None);
        assert_eq!(next_page_info(""), None);
    }

    #[test]
    fn test_first_page_query() {
        let min = DateTime::parse_from_rfc3339("2025-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let query = client().page_query(Some(min), None);
        assert!(query.contains(&("status", "any".to_string())));
        assert!(query.contains(&("order", "updated_at asc".to_string())));
        assert!(query.contains(&("updated_at_min", "2025-03-01T12:00:00Z".to_string())));
        assert!(query.contains(&("limit", "50".to_string())));
    }

    #[test]
    fn test_cursor_query_only_limit_and_page_info() {
        let query = client().page_query(None, Some("abc"));
        assert_eq!(
            query,
            vec![("limit", "50".to_string()), ("page_info", "abc".to_string())]
        );
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client().endpoint("orders.json"),
            "https://dutchthrift.myshopify.com/admin/api/2024-10/orders.json"
        );
    }

    #[test]
    fn test_requires_credentials() {
        assert!(ShopifyClient::new(ShopifyConfig::default()).is_err());
    }
}
