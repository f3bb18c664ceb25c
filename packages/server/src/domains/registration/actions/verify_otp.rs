//! Verification handler: one atomic decision against the pending record.

use tracing::info;

use crate::domains::registration::errors::RegistrationError;
use crate::domains::registration::models::{PendingRegistration, QueuedMail};
use crate::domains::registration::otp::{
    is_expired, verify_secret, MAX_FAILED_ATTEMPTS, OTP_LENGTH,
};
use crate::domains::registration::types::{OtpVerificationResult, VerifyOtpRequest};
use crate::kernel::ServerDeps;

/// Collapse an unexpected failure on the verification path.
fn internal(err: anyhow::Error) -> RegistrationError {
    RegistrationError::internal("Failed to verify code", err)
}

/// Verify a code against the pending registration for an email.
///
/// Terminal outcomes delete the record: a correct code (success), an expired
/// code (`deadline-exceeded`, queued mail purged too), or exhaustion of the
/// attempt budget (`permission-denied`). A wrong code under the budget leaves
/// the record in place with the attempt counted.
pub async fn verify_otp(
    request: VerifyOtpRequest,
    deps: &ServerDeps,
) -> Result<OtpVerificationResult, RegistrationError> {
    let VerifyOtpRequest { email, code } = request;

    if email.is_empty() || code.is_empty() {
        return Err(RegistrationError::InvalidArgument(
            "Email and code are required".to_string(),
        ));
    }

    if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(RegistrationError::InvalidArgument(
            "Code must be 6 digits".to_string(),
        ));
    }

    let pending = PendingRegistration::find_by_email(&email, &deps.db_pool)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            RegistrationError::NotFound("No pending registration found".to_string())
        })?;

    if pending.failed_attempts >= MAX_FAILED_ATTEMPTS {
        PendingRegistration::delete(&email, &deps.db_pool)
            .await
            .map_err(internal)?;
        return Err(RegistrationError::PermissionDenied(
            "Too many failed attempts. Please register again".to_string(),
        ));
    }

    if is_expired(pending.otp_expires_at) {
        PendingRegistration::delete(&email, &deps.db_pool)
            .await
            .map_err(internal)?;
        QueuedMail::delete_for_recipient(&email, &deps.db_pool)
            .await
            .map_err(internal)?;
        return Err(RegistrationError::DeadlineExceeded(
            "Verification code has expired".to_string(),
        ));
    }

    let is_valid = verify_secret(&code, &pending.otp_hash).map_err(internal)?;

    if !is_valid {
        let failed_attempts =
            PendingRegistration::increment_failed_attempts(&email, &deps.db_pool)
                .await
                .map_err(internal)?;

        let remaining_attempts = MAX_FAILED_ATTEMPTS - failed_attempts;
        if remaining_attempts <= 0 {
            PendingRegistration::delete(&email, &deps.db_pool)
                .await
                .map_err(internal)?;
            return Err(RegistrationError::PermissionDenied(
                "Too many failed attempts. Please register again".to_string(),
            ));
        }

        return Ok(OtpVerificationResult::rejected(format!(
            "Invalid code. {} attempts remaining",
            remaining_attempts
        )));
    }

    PendingRegistration::delete(&email, &deps.db_pool)
        .await
        .map_err(internal)?;
    QueuedMail::delete_for_recipient(&email, &deps.db_pool)
        .await
        .map_err(internal)?;

    info!(email = %email, "OTP verified");

    // `pending.password` is the stored bcrypt hash, not the plaintext the
    // user typed. See DESIGN.md before feeding this to account creation.
    Ok(OtpVerificationResult::verified(
        pending.email,
        pending.display_name,
        pending.password,
    ))
}
