use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Salted SHA-256 of `password`, stored as `<salt>$<hex digest>`.
pub fn hash(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let first = hash("correct horse");
        let second = hash("correct horse");
        assert_ne!(first, second);

        let (salt, stored) = first.split_once('$').unwrap();
        assert_eq!(salt.len(), 32);
        assert_eq!(stored, digest(salt, "correct horse"));
        assert_ne!(stored, digest(salt, "battery staple"));
    }
}
