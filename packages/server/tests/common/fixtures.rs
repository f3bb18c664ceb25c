//! Test fixtures for creating and manipulating registration state.
//!
//! Issuance goes through the real action; timestamp manipulation reaches into
//! the tables directly, which is the only way to travel in time in tests.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use sqlx::PgPool;

use server_core::domains::registration::actions::send_otp;
use server_core::domains::registration::models::QueuedMail;
use server_core::domains::registration::types::{SendOtpRequest, SendOtpResponse};
use server_core::domains::registration::RegistrationError;
use server_core::kernel::ServerDeps;

/// Issue a first-time registration for the given email
pub async fn issue_registration(
    deps: &ServerDeps,
    email: &str,
    display_name: &str,
    password: &str,
) -> Result<SendOtpResponse, RegistrationError> {
    send_otp(
        SendOtpRequest {
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
            password: Some(password.to_string()),
            resend: false,
        },
        deps,
    )
    .await
}

/// Request a resend for the given email (no displayName/password)
pub async fn request_resend(
    deps: &ServerDeps,
    email: &str,
) -> Result<SendOtpResponse, RegistrationError> {
    send_otp(
        SendOtpRequest {
            email: email.to_string(),
            display_name: None,
            password: None,
            resend: true,
        },
        deps,
    )
    .await
}

/// Move `last_resend_at` into the past so the cooldown no longer applies
pub async fn backdate_last_resend(pool: &PgPool, email: &str, seconds: i64) -> Result<()> {
    sqlx::query("UPDATE pending_registrations SET last_resend_at = $1 WHERE email = $2")
        .bind(Utc::now() - Duration::seconds(seconds))
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

/// Move `otp_expires_at` into the past so the code reads as expired
pub async fn expire_otp(pool: &PgPool, email: &str) -> Result<()> {
    sqlx::query("UPDATE pending_registrations SET otp_expires_at = $1 WHERE email = $2")
        .bind(Utc::now() - Duration::seconds(1))
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

/// Move `created_at` into the past so the cleanup sweep reaps the record
pub async fn backdate_created_at(pool: &PgPool, email: &str, minutes: i64) -> Result<()> {
    sqlx::query("UPDATE pending_registrations SET created_at = $1 WHERE email = $2")
        .bind(Utc::now() - Duration::minutes(minutes))
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}

/// Move `delivery_start_time` of all mail for a recipient into the past
pub async fn backdate_mail(pool: &PgPool, recipient: &str, minutes: i64) -> Result<()> {
    sqlx::query("UPDATE mail SET delivery_start_time = $1 WHERE recipient = $2")
        .bind(Utc::now() - Duration::minutes(minutes))
        .bind(recipient)
        .execute(pool)
        .await?;
    Ok(())
}

/// Pull the plaintext code out of the most recently queued verification email
pub async fn extract_code_from_mail(pool: &PgPool, recipient: &str) -> Result<String> {
    let mail = QueuedMail::find_for_recipient(recipient, pool).await?;
    let latest = mail.last().context("no mail queued for recipient")?;

    let marker = "Your verification code is: ";
    let start = latest
        .text_body
        .find(marker)
        .context("mail body does not contain a code")?
        + marker.len();
    Ok(latest.text_body[start..start + 6].to_string())
}

/// A wrong 6-digit code, guaranteed different from `actual`
pub fn wrong_code(actual: &str) -> String {
    if actual == "999999" {
        "999998".to_string()
    } else {
        "999999".to_string()
    }
}
