//! Issuance handler: validate, rate-limit, (re)issue a code, queue the email.

use chrono::{Duration, Utc};
use tracing::info;

use crate::domains::registration::errors::RegistrationError;
use crate::domains::registration::models::{MailMessage, PendingRegistration, QueuedMail};
use crate::domains::registration::otp::{
    expiry_timestamp, generate_otp, hash_secret, MAX_RESEND_PER_HOUR, OTP_EXPIRY_MINUTES,
    RESEND_COOLDOWN_MINUTES,
};
use crate::domains::registration::types::{SendOtpRequest, SendOtpResponse};
use crate::kernel::ServerDeps;

/// Collapse an unexpected failure on the issuance path.
fn internal(err: anyhow::Error) -> RegistrationError {
    RegistrationError::internal("Failed to send verification code", err)
}

/// Issue or reissue a verification code for an email.
///
/// Creates (or replaces) the pending registration and queues exactly one
/// email carrying the plaintext code. Rate limits apply only when a prior
/// record exists: the hourly cap first, then the one-minute cooldown.
pub async fn send_otp(
    request: SendOtpRequest,
    deps: &ServerDeps,
) -> Result<SendOtpResponse, RegistrationError> {
    let SendOtpRequest {
        email,
        display_name,
        password,
        resend,
    } = request;

    if email.is_empty() {
        return Err(RegistrationError::InvalidArgument(
            "Email is required".to_string(),
        ));
    }

    if !resend
        && (display_name.as_deref().unwrap_or("").is_empty()
            || password.as_deref().unwrap_or("").is_empty())
    {
        return Err(RegistrationError::InvalidArgument(
            "DisplayName and password are required for new registrations".to_string(),
        ));
    }

    if !email.contains('@') {
        return Err(RegistrationError::InvalidArgument(
            "Invalid email format".to_string(),
        ));
    }

    let existing = PendingRegistration::find_by_email(&email, &deps.db_pool)
        .await
        .map_err(internal)?;

    if resend && existing.is_none() {
        return Err(RegistrationError::NotFound(
            "No pending registration found for this email".to_string(),
        ));
    }

    // On resend the stored values win; the request only fills gaps. The
    // stored password is already a bcrypt hash and must not be re-hashed.
    let (final_display_name, final_password) = match (&existing, resend) {
        (Some(existing), true) => (
            Some(existing.display_name.clone()).filter(|v| !v.is_empty()).or(display_name),
            Some(existing.password.clone()).filter(|v| !v.is_empty()).or(password),
        ),
        _ => (display_name, password),
    };

    let (final_display_name, final_password) = match (final_display_name, final_password) {
        (Some(name), Some(password)) if !name.is_empty() && !password.is_empty() => {
            (name, password)
        }
        _ => {
            return Err(RegistrationError::InvalidArgument(
                "Registration data is incomplete".to_string(),
            ))
        }
    };

    if let Some(existing) = &existing {
        // Hourly cap: resend_count is never decremented, so the cap only
        // bites while the last issuance is inside the window.
        if existing.resend_count >= MAX_RESEND_PER_HOUR {
            let hour_ago = Utc::now() - Duration::hours(1);
            if existing.last_resend_at > hour_ago {
                return Err(RegistrationError::ResourceExhausted(
                    "Too many attempts. Please try again later".to_string(),
                ));
            }
        }

        let cooldown_end = existing.last_resend_at + Duration::minutes(RESEND_COOLDOWN_MINUTES);
        if Utc::now() < cooldown_end {
            return Err(RegistrationError::ResourceExhausted(
                "Please wait before requesting a new code".to_string(),
            ));
        }
    }

    let otp = generate_otp();
    let otp_hash = hash_secret(&otp).map_err(internal)?;

    // Only a first issuance hashes the password; a resend carries the stored
    // hash forward unchanged.
    let password_hash = if resend {
        final_password
    } else {
        hash_secret(&final_password).map_err(internal)?
    };

    let now = Utc::now();
    let pending = PendingRegistration {
        email: email.clone(),
        display_name: final_display_name.clone(),
        password: password_hash,
        otp_hash,
        otp_expires_at: expiry_timestamp(OTP_EXPIRY_MINUTES),
        failed_attempts: 0,
        resend_count: existing.as_ref().map(|e| e.resend_count + 1).unwrap_or(0),
        last_resend_at: now,
        created_at: existing.as_ref().map(|e| e.created_at).unwrap_or(now),
    };

    pending.upsert(&deps.db_pool).await.map_err(internal)?;

    QueuedMail::enqueue(
        &email,
        MailMessage::verification_code(&final_display_name, &otp),
        &deps.db_pool,
    )
    .await
    .map_err(internal)?;

    info!(email = %email, resend, "OTP sent");

    Ok(SendOtpResponse {
        success: true,
        message: "Verification code sent successfully".to_string(),
    })
}
