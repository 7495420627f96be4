use crate::config::AppConfig;
use crate::errors::ThriftHubError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;

/// 哈希密码（Argon2id，参数来自配置）
pub fn hash_password(password: &str) -> Result<String, ThriftHubError> {
    let config = AppConfig::get();
    let params = Params::new(
        config.argon2.memory_cost,
        config.argon2.time_cost,
        config.argon2.parallelism,
        None,
    )
    .map_err(|e| ThriftHubError::validation(format!("Invalid Argon2 parameters: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ThriftHubError::validation(format!("Password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// 验证密码，哈希串里自带参数
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed_hash) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// 生成满足密码策略的随机密码（初始化管理员时使用）
pub fn generate_password(len: usize) -> String {
    const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const DIGITS: &[u8] = b"23456789";

    let len = len.max(8);
    let mut rng = rand::rng();
    let mut pick = |set: &[u8]| set[rng.random_range(0..set.len())] as char;

    // 前三位保证大写、小写、数字各一个
    let mut password = String::with_capacity(len);
    password.push(pick(UPPER));
    password.push(pick(LOWER));
    password.push(pick(DIGITS));
    let all = [LOWER, UPPER, DIGITS].concat();
    while password.len() < len {
        password.push(pick(&all));
    }
    password
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::validate_password;

    #[test]
    fn test_generated_password_passes_policy() {
        for _ in 0..20 {
            let pwd = generate_password(16);
            assert_eq!(pwd.len(), 16);
            assert!(validate_password(&pwd).is_valid, "{pwd}");
        }
        assert_eq!(generate_password(3).len(), 8);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("Secret123", "not-a-hash"));
    }
}
