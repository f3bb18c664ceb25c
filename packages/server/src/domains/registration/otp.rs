//! OTP code generation, secret hashing, and expiry arithmetic.
//!
//! The same salted bcrypt hash is used for both the one-time code and the
//! registration password; neither is ever persisted in plaintext.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

/// Fixed bcrypt work factor for OTP and password hashes.
pub const SALT_ROUNDS: u32 = 10;

/// Minutes a freshly issued code stays valid.
pub const OTP_EXPIRY_MINUTES: i64 = 10;

/// Resends allowed before the hourly cap kicks in.
pub const MAX_RESEND_PER_HOUR: i32 = 3;

/// Minimum minutes between consecutive issuances for the same email.
pub const RESEND_COOLDOWN_MINUTES: i64 = 1;

/// Wrong-code attempts before the pending registration is destroyed.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Age after which the cleanup sweep reaps registrations and queued mail.
pub const CLEANUP_RETENTION_MINUTES: i64 = 60;

/// Maximum mail rows deleted per sweep run (store batch-size ceiling).
pub const MAIL_CLEANUP_BATCH_SIZE: i64 = 500;

/// Generate a uniformly random 6-digit code in `[100000, 999999]`.
///
/// The range excludes leading-zero codes on purpose.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Hash a secret (OTP code or password) with bcrypt at the fixed work factor.
pub fn hash_secret(value: &str) -> Result<String> {
    Ok(bcrypt::hash(value, SALT_ROUNDS)?)
}

/// Check a plaintext secret against a stored bcrypt hash.
pub fn verify_secret(value: &str, hash: &str) -> Result<bool> {
    Ok(bcrypt::verify(value, hash)?)
}

/// Whether an expiry timestamp has passed.
pub fn is_expired(expires_at: DateTime<Utc>) -> bool {
    Utc::now() > expires_at
}

/// Timestamp `minutes_from_now` minutes in the future.
pub fn expiry_timestamp(minutes_from_now: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(minutes_from_now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_codes_are_six_digits() {
        for _ in 0..1_000_000 {
            let code = generate_otp();
            assert_eq!(code.len(), OTP_LENGTH, "code should be 6 characters");
            assert!(
                code.chars().all(|c| c.is_ascii_digit()),
                "code should be numeric: {}",
                code
            );
            assert_ne!(code.as_bytes()[0], b'0', "code should not lead with zero");
        }
    }

    #[test]
    fn test_generated_codes_stay_in_range() {
        for _ in 0..10_000 {
            let code: u32 = generate_otp().parse().unwrap();
            assert!((100_000..=999_999).contains(&code));
        }
    }

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_secret("483920").unwrap();
        assert_ne!(hash, "483920", "hash should not be the plaintext");
        assert!(verify_secret("483920", &hash).unwrap());
        assert!(!verify_secret("483921", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_secret("Secret1").unwrap();
        let second = hash_secret("Secret1").unwrap();
        assert_ne!(first, second, "same input should produce distinct hashes");
        assert!(verify_secret("Secret1", &first).unwrap());
        assert!(verify_secret("Secret1", &second).unwrap());
    }

    #[test]
    fn test_expiry_arithmetic() {
        let future = expiry_timestamp(10);
        assert!(!is_expired(future));
        assert!(is_expired(Utc::now() - Duration::seconds(1)));

        let delta = future - Utc::now();
        assert!(delta <= Duration::minutes(10));
        assert!(delta > Duration::minutes(9));
    }
}
