use once_cell::sync::Lazy;
use regex::Regex;

// 回复/转发前缀，可带计数，例如 `Re[2]:`
static PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:re|fw|fwd|antw|doorst|wg|aw)\s*(?:\[\d+\])?\s*:\s*")
        .expect("Invalid subject prefix regex")
});
static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid subject tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid space regex"));

/// 归一化邮件主题：去掉（可重复的）回复/转发前缀和方括号标签，压缩空白并转小写
pub fn normalize_subject(subject: &str) -> String {
    let mut current = TAG_RE.replace_all(subject, " ").into_owned();
    loop {
        let stripped = PREFIX_RE.replace(&current, "");
        if stripped.len() == current.len() {
            break;
        }
        current = stripped.into_owned();
    }
    SPACE_RE
        .replace_all(current.trim(), " ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_repeated_prefixes() {
        assert_eq!(normalize_subject("Re: RE: Fwd: Bestelling #1001"), "bestelling #1001");
        assert_eq!(normalize_subject("Antw: Doorst: WG: AW: vraag"), "vraag");
        assert_eq!(normalize_subject("Re[3]: Retour"), "retour");
    }

    #[test]
    fn test_strips_tags_and_whitespace() {
        assert_eq!(
            normalize_subject("  [DutchThrift]  Re:   Mijn   retour [#42] "),
            "mijn retour"
        );
    }

    #[test]
    fn test_keeps_words_that_look_like_prefixes() {
        assert_eq!(normalize_subject("Reparatie jas"), "reparatie jas");
        assert_eq!(normalize_subject(""), "");
    }
}
