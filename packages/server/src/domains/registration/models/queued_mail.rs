use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domains::registration::otp::OTP_EXPIRY_MINUTES;

/// Subject, plaintext, and HTML bodies of one outbound message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl MailMessage {
    /// Render the verification email for a recipient.
    ///
    /// This is the only place the plaintext code is ever written out.
    pub fn verification_code(display_name: &str, otp: &str) -> Self {
        Self {
            subject: "Verify Your Email - Registration Code".to_string(),
            text: format!(
                "Hello {display_name},\n\n\
                 Your verification code is: {otp}\n\n\
                 This code will expire in {OTP_EXPIRY_MINUTES} minutes.\n\n\
                 If you did not request this code, please ignore this email.\n\n\
                 Best regards,\nYour App Team"
            ),
            html: format!(
                r#"
            <div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
              <h2 style="color: #333;">Verify Your Email</h2>
              <p>Hello <strong>{display_name}</strong>,</p>
              <p>Your verification code is:</p>
              <div style="background-color: #f4f4f4; padding: 20px; text-align: center; font-size: 32px; font-weight: bold; letter-spacing: 8px; margin: 20px 0;">
                {otp}
              </div>
              <p style="color: #666;">This code will expire in {OTP_EXPIRY_MINUTES} minutes.</p>
              <p style="color: #999; font-size: 12px;">If you did not request this code, please ignore this email.</p>
            </div>
          "#
            ),
        }
    }
}

/// QueuedMail - one outbound message awaiting the mailer
///
/// Written here, consumed asynchronously by the mail-delivery collaborator.
/// `delivery_start_time` is set at insert and bounds retention.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct QueuedMail {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
    pub delivery_start_time: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl QueuedMail {
    /// Queue a message for delivery
    pub async fn enqueue(recipient: &str, message: MailMessage, pool: &PgPool) -> Result<Self> {
        let mail = sqlx::query_as::<_, QueuedMail>(
            r#"
            INSERT INTO mail (recipient, subject, text_body, html_body)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(recipient)
        .bind(&message.subject)
        .bind(&message.text)
        .bind(&message.html)
        .fetch_one(pool)
        .await?;
        Ok(mail)
    }

    /// Delete all queued mail addressed to a recipient, returning the count
    pub async fn delete_for_recipient(recipient: &str, pool: &PgPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM mail WHERE recipient = $1")
            .bind(recipient)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete mail queued before `cutoff`, at most `limit` rows per call.
    ///
    /// The cap keeps a large backlog from draining in one run; the sweep
    /// picks up the remainder on its next schedule.
    pub async fn delete_started_before(
        cutoff: DateTime<Utc>,
        limit: i64,
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM mail
            WHERE id IN (
                SELECT id FROM mail
                WHERE delivery_start_time < $1
                LIMIT $2
            )
            "#,
        )
        .bind(cutoff)
        .bind(limit)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count queued mail for a recipient (used by tests and diagnostics)
    pub async fn count_for_recipient(recipient: &str, pool: &PgPool) -> Result<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM mail WHERE recipient = $1")
                .bind(recipient)
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Fetch queued mail for a recipient, oldest first
    pub async fn find_for_recipient(recipient: &str, pool: &PgPool) -> Result<Vec<Self>> {
        let mail = sqlx::query_as::<_, QueuedMail>(
            "SELECT * FROM mail WHERE recipient = $1 ORDER BY delivery_start_time ASC",
        )
        .bind(recipient)
        .fetch_all(pool)
        .await?;
        Ok(mail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_contains_code_and_name() {
        let message = MailMessage::verification_code("Ana", "123456");
        assert_eq!(message.subject, "Verify Your Email - Registration Code");
        assert!(message.text.contains("Hello Ana"));
        assert!(message.text.contains("Your verification code is: 123456"));
        assert!(message.text.contains("expire in 10 minutes"));
        assert!(message.html.contains("123456"));
        assert!(message.html.contains("<strong>Ana</strong>"));
    }
}
