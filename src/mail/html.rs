use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Invalid comment regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("Invalid style regex"));
static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("Invalid script regex")
});
static HEAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<head\b[^>]*>.*?</head\s*>").expect("Invalid head regex"));
static BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|tr)\s*>").expect("Invalid line break regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
static ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").expect("Invalid entity regex")
});
static BLANK_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));

/// 把 HTML 邮件正文转换为纯文本
pub fn html_to_text(html: &str) -> String {
    let text = COMMENT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = SCRIPT_RE.replace_all(&text, "");
    let text = HEAD_RE.replace_all(&text, "");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    // 实体只解码一次，`&amp;lt;` 得到 `&lt;`
    let text = ENTITY_RE.replace_all(&text, |caps: &Captures| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n");
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_string()
}

fn decode_entity(entity: &str) -> Option<String> {
    if let Some(num) = entity.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code).map(|c| match c {
            '\u{a0}' => " ".to_string(),
            c => c.to_string(),
        });
    }

    let decoded = match entity {
        "nbsp" | "ensp" | "emsp" | "thinsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "lsquo" | "rsquo" => "'",
        "ldquo" | "rdquo" | "bdquo" => "\"",
        "ndash" => "-",
        "mdash" => "-",
        "hellip" => "...",
        "euro" => "€",
        "copy" => "©",
        "reg" => "®",
        "trade" => "™",
        "eacute" => "é",
        "egrave" => "è",
        "euml" => "ë",
        "ecirc" => "ê",
        "aacute" => "á",
        "agrave" => "à",
        "auml" => "ä",
        "ouml" => "ö",
        "uuml" => "ü",
        "iuml" => "ï",
        "ccedil" => "ç",
        "szlig" => "ß",
        _ => return None,
    };
    Some(decoded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_blocks_and_tags() {
        let html = "<html><head><title>x</title><style>p{color:red}</style></head>\
                    <body><p>Hallo <b>Anna</b>,</p><script>alert(1)</script>\
                    <div>Mijn bestelling is nog niet binnen.</div></body></html>";
        assert_eq!(
            html_to_text(html),
            "Hallo Anna,\nMijn bestelling is nog niet binnen."
        );
    }

    #[test]
    fn test_line_breaks_and_blank_collapse() {
        let html = "regel 1<br>regel 2<br/><br/><br/><br/>regel 3   <br />";
        assert_eq!(html_to_text(html), "regel 1\nregel 2\n\nregel 3");
    }

    #[test]
    fn test_entities() {
        let html = "Prijs:&nbsp;&euro;&nbsp;25 &amp; caf&eacute; &#39;ok&#39; &#x41; &amp;lt; &bogus;";
        assert_eq!(
            html_to_text(html),
            "Prijs: € 25 & café 'ok' A &lt; &bogus;"
        );
    }

    #[test]
    fn test_list_items() {
        let html = "<ul><li>jas</li><li>broek</li></ul>";
        assert_eq!(html_to_text(html), "jas\nbroek");
    }
}
