//! Registration domain wire types.
//!
//! Field names are camelCase to match the mobile client's payloads.

use serde::{Deserialize, Serialize};

/// Request to issue (or reissue) a verification code for an email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub resend: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
}

/// Request to verify a previously issued code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub code: String,
}

/// Outcome of a verification attempt.
///
/// On success the verified triple is handed back so the caller can create the
/// durable account. `password` is the bcrypt hash stored on the pending
/// record, not the plaintext the user typed (see DESIGN.md).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpVerificationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OtpVerificationResult {
    pub fn verified(email: String, display_name: String, password: String) -> Self {
        Self {
            success: true,
            email: Some(email),
            display_name: Some(display_name),
            password: Some(password),
            error: None,
        }
    }

    pub fn rejected(error: String) -> Self {
        Self {
            success: false,
            email: None,
            display_name: None,
            password: None,
            error: Some(error),
        }
    }
}
