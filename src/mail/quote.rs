//! 邮件引用拆分
//!
//! 把一封邮件拆成「本次新写的内容」和「引用的历史邮件」，并从新内容末尾
//! 切出签名。纯文本按行扫描，HTML 按常见客户端的引用标记切分。
//! 找不到引用时 `quoted` 为 `None`，整个正文都视为回复。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub use super::html::html_to_text;

/// 纯文本或 HTML 的拆分结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSplit {
    pub reply: String,
    pub quoted: Option<String>,
    pub signature: Option<String>,
}

/// 一封邮件（可能同时有纯文本和 HTML）的拆分结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/email.ts")]
pub struct SplitMessage {
    pub reply_text: String,
    pub quoted_text: Option<String>,
    pub signature: Option<String>,
    pub reply_html: Option<String>,
    pub quoted_html: Option<String>,
}

// 引用头：英 / 荷 / 德 / 法
static ATTRIBUTION_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^\s*On\s.+\swrote\s*:\s*$",
        r"(?i)^\s*Op\s.+\sschreef\b.*:\s*$",
        r"(?i)^\s*Op\s.+\sheeft\s.+\shet\s+volgende\s+geschreven\s*:\s*$",
        r"(?i)^\s*Am\s.+\sschrieb\b.*:\s*$",
        r"(?i)^\s*Le\s.+\sa\s+écrit\s*:\s*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid attribution regex"))
    .collect()
});

// 引用头换行时，第一行必须以这些词开头
static ATTRIBUTION_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:On|Op|Am|Le)\s").expect("Invalid attribution regex"));

static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*-{2,}\s*(?:original\s+message|oorspronkelijk\s+bericht|origineel\s+bericht|forwarded\s+message|doorgestuurd\s+bericht)\s*-{2,}\s*$",
    )
    .expect("Invalid separator regex")
});

static UNDERSCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*_{10,}\s*$").expect("Invalid underscore regex"));

// Outlook 风格的引用头：From/Van/Von 之后三行内出现 Sent/Verzonden/Date/Datum/Gesendet
static HEADER_FROM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\*?(?:From|Van|Von)\s*:\*?\s*\S").expect("Invalid header regex")
});
static HEADER_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*\*?(?:Sent|Verzonden|Date|Datum|Gesendet)\s*:").expect("Invalid header regex")
});

static MOBILE_FOOTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:sent\s+from\s+my\s.+|verzonden\s+vanaf\s+mijn\s.+|verstuurd\s+vanaf\s+mijn\s.+|outlook\s+voor\s+(?:ios|android)\s+downloaden|get\s+outlook\s+for\s.+)\s*$",
    )
    .expect("Invalid mobile footer regex")
});

const HTML_QUOTE_MARKERS: &[&str] = &[
    "<div class=\"gmail_quote",
    "<blockquote",
    "<div id=\"divrplyfwdmsg\"",
    "<div id=\"appendonsend\"",
    "<div class=\"moz-cite-prefix\"",
    "<div class=\"yahoo_quoted\"",
    "<hr id=\"stopspelling\"",
];

/// 拆分纯文本正文
pub fn split_plain(text: &str) -> QuoteSplit {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.lines().collect();

    let (reply_lines, quoted) = match find_quote_start(&lines) {
        Some(start) => {
            let quoted = lines[start..].join("\n").trim_end().to_string();
            (&lines[..start], Some(quoted))
        }
        None => (&lines[..], None),
    };

    let (reply, signature) = split_signature(reply_lines);
    QuoteSplit {
        reply,
        quoted,
        signature,
    }
}

/// 拆分 HTML 正文，不做签名识别
pub fn split_html(html: &str) -> QuoteSplit {
    // ASCII 小写不改变字节偏移
    let lower = html.to_ascii_lowercase();
    let start = HTML_QUOTE_MARKERS
        .iter()
        .filter_map(|marker| lower.find(marker))
        .min();

    match start {
        Some(pos) => QuoteSplit {
            reply: html[..pos].trim_end().to_string(),
            quoted: Some(html[pos..].to_string()),
            signature: None,
        },
        None => QuoteSplit {
            reply: html.to_string(),
            quoted: None,
            signature: None,
        },
    }
}

/// 拆分一封邮件；纯文本优先，没有纯文本时从 HTML 转换
pub fn split_message(text: Option<&str>, html: Option<&str>) -> SplitMessage {
    let html = html.filter(|h| !h.trim().is_empty());
    let text_split = match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => split_plain(text),
        None => split_plain(&html.map(html_to_text).unwrap_or_default()),
    };
    let html_split = html.map(split_html);

    SplitMessage {
        reply_text: text_split.reply,
        quoted_text: text_split.quoted,
        signature: text_split.signature,
        reply_html: html_split.as_ref().map(|s| s.reply.clone()),
        quoted_html: html_split.and_then(|s| s.quoted),
    }
}

fn find_quote_start(lines: &[&str]) -> Option<usize> {
    (0..lines.len()).find(|&i| is_quote_start(lines, i))
}

fn is_quote_start(lines: &[&str], i: usize) -> bool {
    let line = lines[i];

    if line.trim_start().starts_with('>') {
        return true;
    }
    if SEPARATOR_RE.is_match(line) || UNDERSCORE_RE.is_match(line) {
        return true;
    }
    if is_attribution(line) {
        return true;
    }
    if ATTRIBUTION_START_RE.is_match(line)
        && let Some(next) = lines.get(i + 1)
        && is_attribution(&format!("{} {}", line.trim_end(), next.trim_start()))
    {
        return true;
    }
    if HEADER_FROM_RE.is_match(line) {
        return lines
            .iter()
            .skip(i + 1)
            .take(3)
            .any(|l| HEADER_DATE_RE.is_match(l));
    }
    false
}

fn is_attribution(line: &str) -> bool {
    ATTRIBUTION_RES.iter().any(|re| re.is_match(line))
}

/// 从回复末尾切出签名：RFC 3676 的 `-- ` 分隔行，或最后一行的移动端落款
fn split_signature(lines: &[&str]) -> (String, Option<String>) {
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    let lines = &lines[..end];

    if let Some(delim) = lines.iter().rposition(|l| l.trim_end() == "--") {
        let signature = lines[delim + 1..].join("\n").trim().to_string();
        return (
            join_trimmed(&lines[..delim]),
            (!signature.is_empty()).then_some(signature),
        );
    }

    if let Some((last, rest)) = lines.split_last()
        && MOBILE_FOOTER_RE.is_match(last)
    {
        return (join_trimmed(rest), Some(last.trim().to_string()));
    }

    (join_trimmed(lines), None)
}

fn join_trimmed(lines: &[&str]) -> String {
    lines.join("\n").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(split_plain(""), QuoteSplit::default());
    }

    #[test]
    fn test_no_quote() {
        let split = split_plain("Hoi,\n\nWanneer wordt mijn jas verzonden?\n\n");
        assert_eq!(split.reply, "Hoi,\n\nWanneer wordt mijn jas verzonden?");
        assert_eq!(split.quoted, None);
        assert_eq!(split.signature, None);
    }

    #[test]
    fn test_gt_prefixed_quote() {
        let split = split_plain("Dank je!\r\n\r\n> Je pakket is onderweg.\r\n> Groet, DT");
        assert_eq!(split.reply, "Dank je!");
        assert_eq!(
            split.quoted.as_deref(),
            Some("> Je pakket is onderweg.\n> Groet, DT")
        );
    }

    #[test]
    fn test_gt_inside_line_is_not_quote() {
        let split = split_plain("Prijs was > 50 euro\nklopt dat?");
        assert_eq!(split.quoted, None);
        assert_eq!(split.reply, "Prijs was > 50 euro\nklopt dat?");
    }

    #[test]
    fn test_english_attribution() {
        let text = "Thanks, that works.\n\nOn Mon, 3 Mar 2025 at 10:00, DutchThrift <info@dutchthrift.nl> wrote:\n> Hello";
        let split = split_plain(text);
        assert_eq!(split.reply, "Thanks, that works.");
        assert!(split.quoted.unwrap().starts_with("On Mon, 3 Mar"));
    }

    #[test]
    fn test_dutch_attributions() {
        let split = split_plain("Top!\nOp ma 3 mrt 2025 om 10:00 schreef DutchThrift <info@dutchthrift.nl>:\nTekst");
        assert_eq!(split.reply, "Top!");

        let split = split_plain(
            "Prima.\nOp 3 maart 2025 heeft DutchThrift het volgende geschreven:\nTekst",
        );
        assert_eq!(split.reply, "Prima.");
    }

    #[test]
    fn test_german_and_french_attributions() {
        let split = split_plain("Danke\nAm 03.03.2025 um 10:00 schrieb Shop <a@b.de>:\nx");
        assert_eq!(split.reply, "Danke");
        let split = split_plain("Merci\nLe lun. 3 mars 2025 à 10:00, Shop <a@b.fr> a écrit :\nx");
        assert_eq!(split.reply, "Merci");
    }

    #[test]
    fn test_wrapped_attribution_starts_at_first_line() {
        let text = "Ok!\n\nOn Mon, 3 Mar 2025 at 10:00, DutchThrift Klantenservice\n<info@dutchthrift.nl> wrote:\n> eerder bericht";
        let split = split_plain(text);
        assert_eq!(split.reply, "Ok!");
        assert!(
            split
                .quoted
                .unwrap()
                .starts_with("On Mon, 3 Mar 2025 at 10:00, DutchThrift Klantenservice")
        );
    }

    #[test]
    fn test_separator_lines() {
        for sep in [
            "-----Original Message-----",
            "----- Oorspronkelijk bericht -----",
            "-----Origineel bericht-----",
            "---------- Forwarded message ---------",
            "----- Doorgestuurd bericht -----",
            "________________________________",
        ] {
            let split = split_plain(&format!("Nieuw\n{sep}\nOud"));
            assert_eq!(split.reply, "Nieuw", "separator {sep}");
            assert_eq!(split.quoted, Some(format!("{sep}\nOud")));
        }
    }

    #[test]
    fn test_outlook_header_block() {
        let text = "Zie hieronder.\n\nVan: DutchThrift <info@dutchthrift.nl>\nVerzonden: maandag 3 maart 2025 10:00\nAan: klant@example.com\nOnderwerp: Bestelling";
        let split = split_plain(text);
        assert_eq!(split.reply, "Zie hieronder.");
        assert!(split.quoted.unwrap().starts_with("Van: DutchThrift"));
    }

    #[test]
    fn test_from_line_without_date_is_not_quote() {
        let split = split_plain("From: the attic\nI found this jacket");
        assert_eq!(split.quoted, None);
    }

    #[test]
    fn test_only_quote() {
        let split = split_plain("> alleen citaat\n> nog meer");
        assert_eq!(split.reply, "");
        assert_eq!(split.quoted.as_deref(), Some("> alleen citaat\n> nog meer"));
    }

    #[test]
    fn test_rfc_signature() {
        let split = split_plain("Graag retour.\n\n-- \nAnna de Vries\n06-12345678\n\n> oud\n-- \nDT");
        assert_eq!(split.reply, "Graag retour.");
        assert_eq!(split.signature.as_deref(), Some("Anna de Vries\n06-12345678"));
        // 引用中的签名不动
        assert_eq!(split.quoted.as_deref(), Some("> oud\n-- \nDT"));
    }

    #[test]
    fn test_mobile_footer_signature() {
        let split = split_plain("Ik kom morgen langs.\n\nVerstuurd vanaf mijn iPhone");
        assert_eq!(split.reply, "Ik kom morgen langs.");
        assert_eq!(split.signature.as_deref(), Some("Verstuurd vanaf mijn iPhone"));

        let split = split_plain("Ok\nGet Outlook for Android");
        assert_eq!(split.signature.as_deref(), Some("Get Outlook for Android"));
    }

    #[test]
    fn test_split_html_earliest_marker() {
        let html = "<div>Bedankt!</div><div class=\"gmail_quote\"><div>On ... wrote:</div><blockquote>oud</blockquote></div>";
        let split = split_html(html);
        assert_eq!(split.reply, "<div>Bedankt!</div>");
        assert!(split.quoted.unwrap().starts_with("<div class=\"gmail_quote\">"));
    }

    #[test]
    fn test_split_html_outlook_marker_case_insensitive() {
        let html = "<p>Nieuw</p><DIV id=\"divRplyFwdMsg\">oud</DIV>";
        let split = split_html(html);
        assert_eq!(split.reply, "<p>Nieuw</p>");
        assert_eq!(split.quoted.as_deref(), Some("<DIV id=\"divRplyFwdMsg\">oud</DIV>"));
    }

    #[test]
    fn test_split_html_without_marker() {
        let split = split_html("<p>Alleen nieuw</p>");
        assert_eq!(split.reply, "<p>Alleen nieuw</p>");
        assert_eq!(split.quoted, None);
    }

    #[test]
    fn test_split_message_falls_back_to_html() {
        let html = "<p>Waar blijft #1234?</p><blockquote>vorige mail</blockquote>";
        let split = split_message(None, Some(html));
        assert_eq!(split.reply_html.as_deref(), Some("<p>Waar blijft #1234?</p>"));
        assert_eq!(split.quoted_html.as_deref(), Some("<blockquote>vorige mail</blockquote>"));
        assert!(split.reply_text.starts_with("Waar blijft #1234?"));
    }

    #[test]
    fn test_split_message_prefers_plain_text() {
        let split = split_message(Some("Tekst\n> oud"), Some("<p>html</p>"));
        assert_eq!(split.reply_text, "Tekst");
        assert_eq!(split.quoted_text.as_deref(), Some("> oud"));
        assert_eq!(split.reply_html.as_deref(), Some("<p>html</p>"));
        assert_eq!(split.quoted_html, None);
    }
}
