use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// PendingRegistration - an unverified signup attempt, keyed by email
///
/// At most one row exists per email. The row is short-lived: it is deleted on
/// verify success, on expiry detection, on attempt exhaustion, or by the
/// hourly cleanup sweep. `password` and `otp_hash` hold bcrypt hashes only.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PendingRegistration {
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub otp_hash: String,
    pub otp_expires_at: DateTime<Utc>,
    pub failed_attempts: i32,
    pub resend_count: i32,
    pub last_resend_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl PendingRegistration {
    /// Find the pending registration for an email
    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            "SELECT * FROM pending_registrations WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(pending)
    }

    /// Create-or-replace the pending registration for this email.
    ///
    /// A full replace on conflict mirrors a document `set()`: every field is
    /// rewritten, including `failed_attempts`, which a resend therefore
    /// resets to whatever the new row carries.
    pub async fn upsert(&self, pool: &PgPool) -> Result<Self> {
        let pending = sqlx::query_as::<_, PendingRegistration>(
            r#"
            INSERT INTO pending_registrations
                (email, display_name, password, otp_hash, otp_expires_at,
                 failed_attempts, resend_count, last_resend_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (email) DO UPDATE SET
                display_name = EXCLUDED.display_name,
                password = EXCLUDED.password,
                otp_hash = EXCLUDED.otp_hash,
                otp_expires_at = EXCLUDED.otp_expires_at,
                failed_attempts = EXCLUDED.failed_attempts,
                resend_count = EXCLUDED.resend_count,
                last_resend_at = EXCLUDED.last_resend_at,
                created_at = EXCLUDED.created_at
            RETURNING *
            "#,
        )
        .bind(&self.email)
        .bind(&self.display_name)
        .bind(&self.password)
        .bind(&self.otp_hash)
        .bind(self.otp_expires_at)
        .bind(self.failed_attempts)
        .bind(self.resend_count)
        .bind(self.last_resend_at)
        .bind(self.created_at)
        .fetch_one(pool)
        .await?;
        Ok(pending)
    }

    /// Delete the pending registration for an email (no-op if absent)
    pub async fn delete(email: &str, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
            .bind(email)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Record one more failed attempt and return the new count.
    ///
    /// Single atomic statement so concurrent wrong guesses each count.
    pub async fn increment_failed_attempts(email: &str, pool: &PgPool) -> Result<i32> {
        let failed_attempts = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE pending_registrations
            SET failed_attempts = failed_attempts + 1
            WHERE email = $1
            RETURNING failed_attempts
            "#,
        )
        .bind(email)
        .fetch_one(pool)
        .await?;
        Ok(failed_attempts)
    }

    /// Delete every registration first issued before `cutoff`, returning the
    /// affected emails so the caller can purge their queued mail too.
    pub async fn delete_created_before(
        cutoff: DateTime<Utc>,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        let emails = sqlx::query_scalar::<_, String>(
            "DELETE FROM pending_registrations WHERE created_at < $1 RETURNING email",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;
        Ok(emails)
    }
}
