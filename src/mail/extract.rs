//! 从邮件文本中提取订单号、电话、邮箱、客户姓名与 PostNL 物流单号
//!
//! 全部基于正则，结果去重并保持首次出现的顺序；没有匹配时返回空列表或 `None`。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::MailConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct ExtractedInfo {
    /// 只含数字，例如 `1001`
    pub order_numbers: Vec<String>,
    pub customer_name: Option<String>,
    /// `+<digits>` 格式
    pub phone_numbers: Vec<String>,
    pub email_addresses: Vec<String>,
    pub tracking_codes: Vec<String>,
}

impl ExtractedInfo {
    pub fn is_empty(&self) -> bool {
        self.order_numbers.is_empty()
            && self.customer_name.is_none()
            && self.phone_numbers.is_empty()
            && self.email_addresses.is_empty()
            && self.tracking_codes.is_empty()
    }
}

static HASH_ORDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#\s?(\d{4,6})\b").expect("Invalid order regex"));

static KEYWORD_ORDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:order\s*(?:number|nr|no)|ordernummer|bestelnummer|bestelnr|bestelling|order)\b[\s.:#]*(?:nummer|nr)?[\s.:#]*(\d{4,6})\b",
    )
    .expect("Invalid order keyword regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+|\b0)[\d(][\d\s\-.()]{6,24}\d").expect("Invalid phone regex")
});

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}\b")
        .expect("Invalid email regex")
});

static INTRO_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:mijn naam is|my name is|ik ben)\s+([\p{L}][\p{L}'\- ]{0,60})")
        .expect("Invalid name regex")
});

static CLOSING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:met\s+vriendelijke\s+groet(?:en)?|vriendelijke\s+groet(?:en)?|mvg|groetjes|groet(?:en)?|kind\s+regards|best\s+regards|regards|thanks|bedankt|cheers)\s*(?:[,.!]\s*(.*))?$",
    )
    .expect("Invalid closing regex")
});

static TRACKING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b3S[A-Z0-9]{11,13}\b").expect("Invalid tracking regex"));

// 姓名中的小写前缀（van der Berg, de Vries）
const NAME_PARTICLES: &[&str] = &[
    "van", "de", "der", "den", "het", "ter", "ten", "te", "von", "la", "le", "du", "di", "da",
];

/// 订单号和客户信息提取器
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    order_prefixes: Vec<String>,
    own_addresses: Vec<String>,
    prefix_res: Vec<Regex>,
}

impl Extractor {
    pub fn new(order_prefixes: Vec<String>, own_addresses: Vec<String>) -> Self {
        let prefix_res = order_prefixes
            .iter()
            .filter(|p| !p.trim().is_empty())
            .filter_map(|p| {
                Regex::new(&format!(r"(?i)\b{}-?(\d{{4,6}})\b", regex::escape(p.trim()))).ok()
            })
            .collect();
        let own_addresses = own_addresses
            .into_iter()
            .map(|a| a.trim().to_lowercase())
            .collect();
        Self {
            order_prefixes,
            own_addresses,
            prefix_res,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(config.order_prefixes.clone(), config.own_addresses.clone())
    }

    pub fn order_prefixes(&self) -> &[String] {
        &self.order_prefixes
    }

    pub fn extract(&self, text: &str) -> ExtractedInfo {
        ExtractedInfo {
            order_numbers: self.extract_order_numbers(text),
            customer_name: extract_customer_name(text),
            phone_numbers: extract_phone_numbers(text),
            email_addresses: self.extract_email_addresses(text),
            tracking_codes: extract_tracking_codes(text),
        }
    }

    /// `#1234`、`bestelling 1234`、`DT-1234` 三种写法，按出现位置排序
    pub fn extract_order_numbers(&self, text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, String)> = Vec::new();
        let mut collect = |re: &Regex| {
            for caps in re.captures_iter(text) {
                if let Some(m) = caps.get(1) {
                    hits.push((m.start(), m.as_str().to_string()));
                }
            }
        };
        collect(&HASH_ORDER_RE);
        collect(&KEYWORD_ORDER_RE);
        for re in &self.prefix_res {
            collect(re);
        }

        hits.sort_by_key(|(pos, _)| *pos);
        dedup_in_order(hits.into_iter().map(|(_, n)| n))
    }

    pub fn extract_email_addresses(&self, text: &str) -> Vec<String> {
        dedup_in_order(
            EMAIL_RE
                .find_iter(text)
                .map(|m| m.as_str().trim_end_matches('.').to_lowercase())
                .filter(|addr| !self.own_addresses.contains(addr)),
        )
    }
}

/// 提取电话号码并归一化为 `+<digits>`；荷兰本地号码（0 + 9 位）转为 `+31`
pub fn extract_phone_numbers(text: &str) -> Vec<String> {
    dedup_in_order(
        PHONE_RE
            .find_iter(text)
            .filter_map(|m| normalize_phone(m.as_str())),
    )
}

/// 转成 E.164。带 `+` 或 `00` 的按国际号码保留；以单个 `0` 开头的只认荷兰国内格式
/// （共 10 位），位数不符的丢弃，无法判断属于哪个国家
fn normalize_phone(raw: &str) -> Option<String> {
    // +31 (0)6 ... 中的 (0) 不拨
    let cleaned = raw.replace("(0)", "");
    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
    if !(9..=15).contains(&digits.len()) {
        return None;
    }

    if cleaned.trim_start().starts_with('+') {
        return Some(format!("+{digits}"));
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return (rest.len() >= 8).then(|| format!("+{rest}"));
    }
    if let Some(rest) = digits.strip_prefix('0')
        && rest.len() == 9
    {
        return Some(format!("+31{rest}"));
    }
    None
}

pub fn extract_tracking_codes(text: &str) -> Vec<String> {
    dedup_in_order(
        TRACKING_RE
            .find_iter(text)
            .map(|m| m.as_str().to_uppercase()),
    )
}

/// 先找自我介绍（「mijn naam is X」），再找结束语之后的署名行
pub fn extract_customer_name(text: &str) -> Option<String> {
    for caps in INTRO_NAME_RE.captures_iter(text) {
        if let Some(name) = caps.get(1).and_then(|m| take_name(m.as_str())) {
            return Some(name);
        }
    }

    let lines: Vec<&str> = text.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = CLOSING_RE.captures(line) else {
            continue;
        };
        // 「Groet, Anna」写在同一行
        if let Some(inline) = caps.get(1).map(|m| m.as_str().trim())
            && !inline.is_empty()
        {
            if let Some(name) = plausible_name(inline) {
                return Some(name);
            }
            continue;
        }
        if let Some(name) = lines[i + 1..]
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .take(3)
            .find_map(plausible_name)
        {
            return Some(name);
        }
    }
    None
}

// 自我介绍后面通常跟着其它内容，只取大写开头的词和姓名前缀
fn take_name(candidate: &str) -> Option<String> {
    let mut words: Vec<&str> = Vec::new();
    for word in candidate.split_whitespace() {
        if words.len() == 4 {
            break;
        }
        if starts_uppercase(word) {
            words.push(word);
        } else if !words.is_empty() && NAME_PARTICLES.contains(&word.to_lowercase().as_str()) {
            words.push(word);
        } else {
            break;
        }
    }
    while words
        .last()
        .is_some_and(|w| NAME_PARTICLES.contains(&w.to_lowercase().as_str()))
    {
        words.pop();
    }
    plausible_name(&words.join(" "))
}

fn plausible_name(line: &str) -> Option<String> {
    let name = line.trim().trim_end_matches([',', '.', '!']).trim();
    let word_count = name.split_whitespace().count();
    let lower = name.to_lowercase();
    let ok = (1..=4).contains(&word_count)
        && name.chars().count() <= 40
        && starts_uppercase(name)
        && !name.chars().any(|c| c.is_ascii_digit())
        && !name.contains('@')
        && !lower.contains("http")
        && !lower.contains("www.")
        && !CLOSING_RE.is_match(name);
    ok.then(|| name.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn starts_uppercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_uppercase)
}

fn dedup_in_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(
            vec!["DT".to_string()],
            vec!["Info@DutchThrift.nl".to_string()],
        )
    }

    #[test]
    fn test_order_numbers_all_forms() {
        let text = "Hoi, over bestelling 20456 en ook #1001. Ordernummer: 1002, order nr. 1003, DT-1004 en dt1005. Order #1001 nogmaals.";
        assert_eq!(
            extractor().extract_order_numbers(text),
            vec!["20456", "1001", "1002", "1003", "1004", "1005"]
        );
    }

    #[test]
    fn test_order_numbers_length_bounds() {
        let e = extractor();
        assert!(e.extract_order_numbers("#123 en #1234567").is_empty());
        assert_eq!(e.extract_order_numbers("bestelnummer 123456"), vec!["123456"]);
        assert_eq!(e.extract_order_numbers("order number #4321"), vec!["4321"]);
    }

    #[test]
    fn test_phone_numbers() {
        let text = "Bel me op 06-12345678 of +31 (0)6 1234 5678, zakelijk 0031 20 123 4567. Fax: +49 30 1234567.";
        assert_eq!(
            extract_phone_numbers(text),
            vec!["+31612345678", "+31201234567", "+49301234567"]
        );
    }

    #[test]
    fn test_phone_rejects_short_numbers() {
        assert!(extract_phone_numbers("postcode 1012 AB, huisnummer 01-02").is_empty());
    }

    #[test]
    fn test_phone_zero_prefix_requires_dutch_length() {
        assert_eq!(normalize_phone("020-1234567"), Some("+31201234567".to_string()));
        // 11 位、以 0 开头，国家未知
        assert_eq!(normalize_phone("0612 345 6789"), None);
        assert_eq!(normalize_phone("0049 30 1234567"), Some("+49301234567".to_string()));
    }

    #[test]
    fn test_email_addresses_exclude_own() {
        let text = "Van: Anna <Anna.deVries@Example.com>, cc info@dutchthrift.nl en anna.devries@example.com.";
        assert_eq!(
            extractor().extract_email_addresses(text),
            vec!["anna.devries@example.com"]
        );
    }

    #[test]
    fn test_customer_name_from_intro() {
        assert_eq!(
            extract_customer_name("Goedemiddag, mijn naam is Anna van der Berg en ik heb een vraag."),
            Some("Anna van der Berg".to_string())
        );
        assert_eq!(
            extract_customer_name("Hi, my name is Tom. I ordered a coat."),
            Some("Tom".to_string())
        );
        // 「ik ben benieuwd」不是名字
        assert_eq!(extract_customer_name("ik ben benieuwd naar mijn pakket"), None);
    }

    #[test]
    fn test_customer_name_after_closing() {
        let text = "Waar blijft mijn pakket?\n\nMet vriendelijke groet,\n\nPieter Jansen\n06-12345678";
        assert_eq!(extract_customer_name(text), Some("Pieter Jansen".to_string()));

        assert_eq!(
            extract_customer_name("Dank!\nGroet, Sanne"),
            Some("Sanne".to_string())
        );
        assert_eq!(
            extract_customer_name("Kind regards\nwww.example.com\nJohn Smith"),
            Some("John Smith".to_string())
        );
    }

    #[test]
    fn test_customer_name_none() {
        assert_eq!(extract_customer_name("Waar is mijn bestelling #1001?"), None);
    }

    #[test]
    fn test_tracking_codes() {
        let text = "Track & trace: 3SDEVC1234567 en 3sabcd123456789, nogmaals 3SDEVC1234567";
        assert_eq!(
            extract_tracking_codes(text),
            vec!["3SDEVC1234567", "3SABCD123456789"]
        );
    }

    #[test]
    fn test_extract_combines() {
        let info = extractor().extract("Bestelling #1001\nGroetjes,\nLisa");
        assert_eq!(info.order_numbers, vec!["1001"]);
        assert_eq!(info.customer_name.as_deref(), Some("Lisa"));
        assert!(!info.is_empty());
        assert!(extractor().extract("").is_empty());
    }
}
