//! Staff PIN credentials
//!
//! PINs are 4 digits, stored only as argon2 hashes. The raw PIN exists in
//! memory for the duration of a login or staff-create request and is never
//! logged or persisted.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Check the 4-digit PIN format
pub fn validate_pin_format(pin: &str) -> bool {
    pin.len() == 4 && pin.chars().all(|c| c.is_ascii_digit())
}

/// Hash a PIN using argon2
pub fn hash_pin(pin: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(pin.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a PIN against a stored argon2 hash
pub fn verify_pin(pin: &str, pin_hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(pin_hash)?;
    Ok(Argon2::default()
        .verify_password(pin.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_format_is_exactly_four_digits() {
        assert!(validate_pin_format("0412"));
        assert!(!validate_pin_format("123"));
        assert!(!validate_pin_format("12345"));
        assert!(!validate_pin_format("12a4"));
        assert!(!validate_pin_format(""));
    }

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_pin("1234").unwrap();
        assert_ne!(hash, "1234");
        assert!(verify_pin("1234", &hash).unwrap());
        assert!(!verify_pin("4321", &hash).unwrap());
    }

    #[test]
    fn same_pin_hashes_differently_per_salt() {
        let a = hash_pin("1234").unwrap();
        let b = hash_pin("1234").unwrap();
        assert_ne!(a, b);
    }
}
