//! 账号相关的输入校验
//!
//! 返回的错误信息直接作为 API 响应的 message，保持英文。

use once_cell::sync::Lazy;
use regex::Regex;

/// 客服账号一般是名字，允许点号（如 `sanne.v`）
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9._%+-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)*\.[a-z]{2,}$")
        .expect("Invalid email regex")
});

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=32;
const MIN_PASSWORD_LEN: usize = 8;

// 常见弱密码，大小写不敏感
const WEAK_PASSWORDS: &[&str] = &[
    "password1",
    "welkom01",
    "welkom123",
    "qwerty123",
    "admin123",
    "abcd1234",
    "thrifthub1",
    "dutchthrift1",
];

/// 用户名在调用前已转为小写
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !USERNAME_LEN.contains(&username.len()) {
        return Err("Username length must be between 3 and 32 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err(
            "Username must start with a letter or digit and contain only letters, digits, dots, underscores or hyphens",
        );
    }
    Ok(())
}

/// 邮箱在调用前已转为小写
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 密码策略：至少 8 位，含大写、小写和数字，且不在弱密码表中
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let rules: [(bool, &'static str); 4] = [
        (
            password.chars().count() >= MIN_PASSWORD_LEN,
            "Password must be at least 8 characters long",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
    ];

    let mut errors: Vec<&'static str> = rules
        .iter()
        .filter(|(ok, _)| !ok)
        .map(|(_, message)| *message)
        .collect();

    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usernames() {
        assert!(validate_username("sanne.v").is_ok());
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(".hidden").is_err());
        assert!(validate_username("anna de vries").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("info@dutchthrift.nl").is_ok());
        assert!(validate_email("anna+retour@mail.example.co.uk").is_ok());
        assert!(validate_email("anna@localhost").is_err());
        assert!(validate_email("no-at-sign.nl").is_err());
    }

    #[test]
    fn test_password_rules_collect_all_errors() {
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        assert!(result.error_message().contains("at least 8 characters"));
        assert!(result.error_message().contains("uppercase"));
    }

    #[test]
    fn test_password_valid_and_weak() {
        assert!(validate_password("Lensdop2024").is_valid);
        let weak = validate_password("Welkom123");
        assert!(!weak.is_valid);
        assert_eq!(
            weak.errors,
            vec!["Password is too common, please choose a stronger password"]
        );
        assert!(validate_password_simple("Welkom123").is_err());
    }
}
