use super::types::ShopifyOrder;
use crate::models::orders::entities::{LineItem, OrderStatus};
use crate::models::sync::{CustomerUpsert, OrderUpsert};

/// 十进制金额字符串转为分，如 `"12.5"` -> 1250
///
/// 超过两位的小数按四舍五入处理。
pub fn parse_cents(value: &str) -> Option<i64> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut frac_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tens = frac_digits.next().unwrap_or(0);
    let ones = frac_digits.next().unwrap_or(0);
    let round_up = frac_digits.next().is_some_and(|d| d >= 5);

    let cents = whole
        .checked_mul(100)?
        .checked_add(tens * 10 + ones + i64::from(round_up))?;
    Some(if negative { -cents } else { cents })
}

/// Shopify 状态 -> 本地订单状态
pub fn map_status(order: &ShopifyOrder) -> OrderStatus {
    let financial = order.financial_status.as_deref().unwrap_or_default();
    let fulfillment = order.fulfillment_status.as_deref().unwrap_or_default();

    if order.cancelled_at.is_some() {
        OrderStatus::Cancelled
    } else if financial == "refunded" {
        OrderStatus::Refunded
    } else if fulfillment == "fulfilled" {
        OrderStatus::Shipped
    } else if matches!(financial, "paid" | "partially_refunded") {
        OrderStatus::Processing
    } else {
        OrderStatus::Pending
    }
}

/// 合并本地与远端状态：本地已标记送达的订单不会被同步回退为已发货
pub fn merge_status(local: Option<OrderStatus>, incoming: OrderStatus) -> OrderStatus {
    match (local, incoming) {
        (Some(OrderStatus::Delivered), OrderStatus::Shipped) => OrderStatus::Delivered,
        _ => incoming,
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn tracking_numbers(order: &ShopifyOrder) -> Vec<String> {
    let mut numbers: Vec<String> = Vec::new();
    for fulfillment in &order.fulfillments {
        let candidates = fulfillment
            .tracking_number
            .iter()
            .chain(fulfillment.tracking_numbers.iter());
        for number in candidates {
            let number = number.trim();
            if !number.is_empty() && !numbers.iter().any(|n| n == number) {
                numbers.push(number.to_string());
            }
        }
    }
    numbers
}

/// 把 Shopify 订单映射为待写入的本地订单
pub fn map_order(order: ShopifyOrder) -> OrderUpsert {
    let status = map_status(&order);
    let tracking_numbers = tracking_numbers(&order);

    let customer = order.customer.as_ref().map(|c| CustomerUpsert {
        external_id: Some(c.id.to_string()),
        email: non_empty(c.email.as_deref()).map(|e| e.to_lowercase()),
        first_name: non_empty(c.first_name.as_deref()),
        last_name: non_empty(c.last_name.as_deref()),
        phone: non_empty(c.phone.as_deref()),
    });

    let customer_email = non_empty(order.email.as_deref())
        .or_else(|| customer.as_ref().and_then(|c| c.email.clone()))
        .map(|e| e.to_lowercase());
    let customer_name = customer.as_ref().and_then(|c| {
        let name = [c.first_name.as_deref(), c.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    });
    let customer_phone = non_empty(order.phone.as_deref())
        .or_else(|| customer.as_ref().and_then(|c| c.phone.clone()));

    let line_items = order
        .line_items
        .iter()
        .map(|item| LineItem {
            title: item.title.clone(),
            sku: non_empty(item.sku.as_deref()),
            quantity: item.quantity,
            price_cents: item.price.as_deref().and_then(parse_cents).unwrap_or(0),
        })
        .collect();

    OrderUpsert {
        external_id: order.id.to_string(),
        order_number: order.name.trim().to_string(),
        customer,
        customer_email,
        customer_name,
        customer_phone,
        total_cents: order
            .total_price
            .as_deref()
            .and_then(parse_cents)
            .unwrap_or(0),
        currency: non_empty(order.currency.as_deref()).unwrap_or_else(|| "EUR".to_string()),
        status,
        financial_status: non_empty(order.financial_status.as_deref()),
        fulfillment_status: non_empty(order.fulfillment_status.as_deref()),
        tracking_numbers,
        line_items,
        shipping_address: order.shipping_address,
        ordered_at: order.created_at,
        remote_updated_at: order.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shopify::types::{ShopifyFulfillment, ShopifyLineItem};

    fn order() -> ShopifyOrder {
        serde_json::from_str(
            r##"{
                "id": 5550001,
                "name": "#1001",
                "email": "Anna@Example.NL",
                "created_at": "2025-03-01T10:00:00+01:00",
                "updated_at": "2025-03-02T09:30:00+01:00",
                "cancelled_at": null,
                "financial_status": "paid",
                "fulfillment_status": null,
                "total_price": "59.95",
                "currency": "EUR",
                "customer": {"id": 77, "email": "anna@example.nl", "first_name": "Anna", "last_name": "de Vries", "phone": null},
                "line_items": [{"title": "Vintage Levi's 501", "sku": "LV501-32", "quantity": 1, "price": "49.95"}],
                "fulfillments": [],
                "shipping_address": {"city": "Utrecht"}
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("12.34"), Some(1234));
        assert_eq!(parse_cents("12.5"), Some(1250));
        assert_eq!(parse_cents("12"), Some(1200));
        assert_eq!(parse_cents("0.00"), Some(0));
        assert_eq!(parse_cents("-3.10"), Some(-310));
        assert_eq!(parse_cents("1.005"), Some(101));
        assert_eq!(parse_cents(""), None);
        assert_eq!(parse_cents("abc"), None);
    }

    #[test]
    fn test_map_order_fields() {
        let mapped = map_order(order());
        assert_eq!(mapped.external_id, "5550001");
        assert_eq!(mapped.order_number, "#1001");
        assert_eq!(mapped.total_cents, 5995);
        assert_eq!(mapped.status, OrderStatus::Processing);
        assert_eq!(mapped.customer_email.as_deref(), Some("anna@example.nl"));
        assert_eq!(mapped.customer_name.as_deref(), Some("Anna de Vries"));
        assert_eq!(mapped.line_items.len(), 1);
        assert_eq!(mapped.line_items[0].price_cents, 4995);
        assert_eq!(
            mapped.customer.as_ref().and_then(|c| c.external_id.clone()),
            Some("77".to_string())
        );
        assert_eq!(
            mapped.remote_updated_at.map(|d| d.timestamp()),
            Some(1_740_904_200)
        );
    }

    #[test]
    fn test_status_mapping_precedence() {
        let mut o = order();
        o.fulfillment_status = Some("fulfilled".into());
        assert_eq!(map_status(&o), OrderStatus::Shipped);

        o.financial_status = Some("refunded".into());
        assert_eq!(map_status(&o), OrderStatus::Refunded);

        o.cancelled_at = Some("2025-03-03T10:00:00+01:00".into());
        assert_eq!(map_status(&o), OrderStatus::Cancelled);

        let mut o = order();
        o.financial_status = Some("pending".into());
        assert_eq!(map_status(&o), OrderStatus::Pending);
        o.financial_status = Some("partially_refunded".into());
        assert_eq!(map_status(&o), OrderStatus::Processing);
    }

    #[test]
    fn test_tracking_numbers_deduplicated() {
        let mut o = order();
        o.fulfillments = vec![
            ShopifyFulfillment {
                tracking_number: Some("3SABCD1234567".into()),
                tracking_numbers: vec!["3SABCD1234567".into(), "3SXYZ98765432".into()],
            },
            ShopifyFulfillment::default(),
        ];
        assert_eq!(
            map_order(o).tracking_numbers,
            vec!["3SABCD1234567".to_string(), "3SXYZ98765432".to_string()]
        );
    }

    #[test]
    fn test_missing_customer_and_currency() {
        let o = ShopifyOrder {
            id: 1,
            name: " #1002 ".into(),
            customer: None,
            line_items: vec![ShopifyLineItem {
                title: "Jas".into(),
                sku: Some("  ".into()),
                quantity: 2,
                price: None,
            }],
            ..ShopifyOrder::default()
        };
        let mapped = map_order(o);
        assert_eq!(mapped.order_number, "#1002");
        assert_eq!(mapped.currency, "EUR");
        assert!(mapped.customer.is_none());
        assert_eq!(mapped.line_items[0].sku, None);
        assert_eq!(mapped.line_items[0].price_cents, 0);
    }

    #[test]
    fn test_merge_status_never_downgrades_delivered() {
        assert_eq!(
            merge_status(Some(OrderStatus::Delivered), OrderStatus::Shipped),
            OrderStatus::Delivered
        );
        assert_eq!(
            merge_status(Some(OrderStatus::Delivered), OrderStatus::Refunded),
            OrderStatus::Refunded
        );
        assert_eq!(
            merge_status(Some(OrderStatus::Processing), OrderStatus::Shipped),
            OrderStatus::Shipped
        );
        assert_eq!(merge_status(None, OrderStatus::Pending), OrderStatus::Pending);
    }
}
