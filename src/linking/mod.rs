//! 邮件会话自动关联
//!
//! `plan_links` 是纯函数：输入会话当前的关联和服务层预先查好的候选记录，
//! 输出新的关联方案。只填空位，已有关联从不覆盖。

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::customers::entities::Customer;
use crate::models::orders::entities::{Order, OrderStatus};
use crate::models::repairs::entities::Repair;
use crate::models::returns::entities::Return;

/// 会话上的关联槽位
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ThreadLinks {
    pub customer_id: Option<i64>,
    pub order_id: Option<i64>,
    pub return_id: Option<i64>,
    pub repair_id: Option<i64>,
    pub case_id: Option<i64>,
}

/// 候选记录
#[derive(Debug, Clone, Default)]
pub struct LinkCandidates {
    /// 按邮件中提取到的订单号查到的订单，保持订单号出现顺序
    pub orders_by_number: Vec<Order>,
    /// 按发件人邮箱匹配到的客户
    pub customer: Option<Customer>,
    /// 该客户（或该邮箱）名下的订单
    pub customer_orders: Vec<Order>,
    /// 选中订单的退货单
    pub returns: Vec<Return>,
    /// 选中订单的维修单
    pub repairs: Vec<Repair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct LinkPlan {
    pub links: ThreadLinks,
    pub changed: bool,
    pub reasons: Vec<String>,
}

pub fn plan_links(current: &ThreadLinks, candidates: &LinkCandidates) -> LinkPlan {
    let mut links = current.clone();
    let mut reasons = Vec::new();

    if links.order_id.is_none() {
        if let Some(order) = candidates.orders_by_number.first() {
            links.order_id = Some(order.id);
            reasons.push(format!(
                "order {} matched an order number in the message",
                order.order_number
            ));
        } else {
            let mut open = candidates
                .customer_orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled);
            if let (Some(order), None) = (open.next(), open.next()) {
                links.order_id = Some(order.id);
                reasons.push(format!(
                    "order {} is the customer's only open order",
                    order.order_number
                ));
            }
        }
    }

    let order = links.order_id.and_then(|id| find_order(candidates, id));

    if links.customer_id.is_none() {
        if let Some(customer) = &candidates.customer {
            links.customer_id = Some(customer.id);
            reasons.push(format!("customer {} matched the sender address", customer.id));
        } else if let Some(customer_id) = order.and_then(|o| o.customer_id) {
            links.customer_id = Some(customer_id);
            reasons.push(format!(
                "customer {customer_id} taken from order {}",
                order.map(|o| o.order_number.as_str()).unwrap_or_default()
            ));
        }
    }

    if let Some(order_id) = links.order_id {
        if links.return_id.is_none()
            && let Some(ret) = candidates
                .returns
                .iter()
                .filter(|r| r.order_id == Some(order_id) && !r.status.is_terminal())
                .max_by_key(|r| (r.created_at, r.id))
        {
            links.return_id = Some(ret.id);
            reasons.push(format!("return {} is open for the order", ret.return_number));
        }

        if links.repair_id.is_none()
            && let Some(repair) = candidates
                .repairs
                .iter()
                .filter(|r| r.order_id == Some(order_id) && !r.status.is_terminal())
                .max_by_key(|r| (r.created_at, r.id))
        {
            links.repair_id = Some(repair.id);
            reasons.push(format!("repair {} is open for the order", repair.repair_number));
        }
    }

    LinkPlan {
        changed: links != *current,
        links,
        reasons,
    }
}

/// 把提取到的订单号数字展开成库中可能的写法：`#1001`、`1001`、`DT1001`、`DT-1001`
pub fn order_number_candidates(digits: &[String], prefixes: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for d in digits {
        out.push(format!("#{d}"));
        out.push(d.clone());
        for prefix in prefixes {
            out.push(format!("{prefix}{d}"));
            out.push(format!("{prefix}-{d}"));
        }
    }
    out.dedup();
    out
}

/// 按订单号在邮件中出现的先后排序查到的订单
pub fn order_by_extraction(mut orders: Vec<Order>, digits: &[String]) -> Vec<Order> {
    orders.sort_by_key(|o| {
        let own = o.number_digits();
        digits
            .iter()
            .position(|d| *d == own)
            .unwrap_or(usize::MAX)
    });
    orders
}

fn find_order(candidates: &LinkCandidates, id: i64) -> Option<&Order> {
    candidates
        .orders_by_number
        .iter()
        .chain(candidates.customer_orders.iter())
        .find(|o| o.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::Priority;
    use crate::models::repairs::entities::RepairStatus;
    use crate::models::returns::entities::ReturnStatus;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_740_000_000 + secs, 0).unwrap()
    }

    fn order(id: i64, number: &str, customer_id: Option<i64>, status: OrderStatus) -> Order {
        Order {
            id,
            external_id: None,
            order_number: number.to_string(),
            customer_id,
            customer_email: None,
            customer_name: None,
            customer_phone: None,
            total_cents: 4500,
            currency: "EUR".into(),
            status,
            financial_status: None,
            fulfillment_status: None,
            tracking_numbers: vec![],
            line_items: vec![],
            shipping_address: None,
            ordered_at: None,
            synced_at: None,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn customer(id: i64) -> Customer {
        Customer {
            id,
            external_id: None,
            email: Some("anna@example.com".into()),
            first_name: Some("Anna".into()),
            last_name: None,
            phone: None,
            notes: None,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn ret(id: i64, order_id: i64, status: ReturnStatus, created: i64) -> Return {
        Return {
            id,
            return_number: format!("RET-{id:08}"),
            order_id: Some(order_id),
            customer_id: None,
            reason: None,
            status,
            tracking_number: None,
            refund_cents: None,
            items: vec![],
            internal_notes: None,
            received_at: None,
            completed_at: None,
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    fn repair(id: i64, order_id: i64, status: RepairStatus, created: i64) -> Repair {
        Repair {
            id,
            repair_number: format!("REP-{id:08}"),
            order_id: Some(order_id),
            customer_id: None,
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            product_name: "Barbour jas".into(),
            serial_number: None,
            issue_description: "rits kapot".into(),
            status,
            priority: Priority::Normal,
            assigned_to: None,
            cost_cents: None,
            completed_at: None,
            created_at: ts(created),
            updated_at: ts(created),
        }
    }

    #[test]
    fn test_order_number_match_fills_everything() {
        let candidates = LinkCandidates {
            orders_by_number: vec![
                order(10, "#1001", Some(3), OrderStatus::Shipped),
                order(11, "#1002", Some(3), OrderStatus::Shipped),
            ],
            returns: vec![
                ret(1, 10, ReturnStatus::Requested, 10),
                ret(2, 10, ReturnStatus::Received, 20),
                ret(3, 10, ReturnStatus::Closed, 30),
            ],
            repairs: vec![
                repair(5, 10, RepairStatus::Cancelled, 50),
                repair(4, 10, RepairStatus::InRepair, 40),
            ],
            ..Default::default()
        };
        let plan = plan_links(&ThreadLinks::default(), &candidates);
        assert!(plan.changed);
        assert_eq!(
            plan.links,
            ThreadLinks {
                customer_id: Some(3),
                order_id: Some(10),
                return_id: Some(2),
                repair_id: Some(4),
                case_id: None,
            }
        );
        assert_eq!(plan.reasons.len(), 4);
    }

    #[test]
    fn test_single_open_customer_order() {
        let candidates = LinkCandidates {
            customer: Some(customer(7)),
            customer_orders: vec![
                order(20, "#2000", Some(7), OrderStatus::Cancelled),
                order(21, "#2001", Some(7), OrderStatus::Processing),
            ],
            ..Default::default()
        };
        let plan = plan_links(&ThreadLinks::default(), &candidates);
        assert_eq!(plan.links.order_id, Some(21));
        assert_eq!(plan.links.customer_id, Some(7));
    }

    #[test]
    fn test_multiple_open_customer_orders_are_ambiguous() {
        let candidates = LinkCandidates {
            customer: Some(customer(7)),
            customer_orders: vec![
                order(20, "#2000", Some(7), OrderStatus::Delivered),
                order(21, "#2001", Some(7), OrderStatus::Processing),
            ],
            ..Default::default()
        };
        let plan = plan_links(&ThreadLinks::default(), &candidates);
        assert_eq!(plan.links.order_id, None);
        assert_eq!(plan.links.customer_id, Some(7));
    }

    #[test]
    fn test_existing_links_are_never_overwritten() {
        let current = ThreadLinks {
            customer_id: Some(1),
            order_id: Some(99),
            return_id: None,
            repair_id: None,
            case_id: Some(5),
        };
        let candidates = LinkCandidates {
            orders_by_number: vec![order(10, "#1001", Some(3), OrderStatus::Shipped)],
            customer: Some(customer(3)),
            returns: vec![ret(1, 10, ReturnStatus::Requested, 10)],
            ..Default::default()
        };
        let plan = plan_links(&current, &candidates);
        assert_eq!(plan.links.order_id, Some(99));
        assert_eq!(plan.links.customer_id, Some(1));
        // 退货属于另一个订单，不关联
        assert_eq!(plan.links.return_id, None);
        assert!(!plan.changed);
        assert!(plan.reasons.is_empty());
    }

    #[test]
    fn test_order_number_candidates() {
        let c = order_number_candidates(&["1001".to_string()], &["DT".to_string()]);
        assert_eq!(c, vec!["#1001", "1001", "DT1001", "DT-1001"]);
        assert!(order_number_candidates(&[], &["DT".to_string()]).is_empty());
    }

    #[test]
    fn test_order_by_extraction_keeps_mail_order() {
        let orders = vec![
            order(1, "#1001", None, OrderStatus::Pending),
            order(2, "DT1002", None, OrderStatus::Pending),
        ];
        let sorted = order_by_extraction(orders, &["1002".to_string(), "1001".to_string()]);
        assert_eq!(sorted.iter().map(|o| o.id).collect::<Vec<_>>(), vec![2, 1]);
    }

    #[test]
    fn test_nothing_to_link() {
        let plan = plan_links(&ThreadLinks::default(), &LinkCandidates::default());
        assert!(!plan.changed);
        assert_eq!(plan.links, ThreadLinks::default());
    }
}
