use rand::Rng;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 生成指定长度的大写字母数字随机串
pub fn random_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// 生成业务单号，如 `RET-7K2Q9XAB`
pub fn record_number(prefix: &str) -> String {
    format!("{prefix}-{}", random_code(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_number_shape() {
        let number = record_number("REP");
        assert!(number.starts_with("REP-"));
        let code = &number[4..];
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }
}
