//! Registration endpoints: issue and verify email one-time codes.

use axum::{extract::Extension, Json};

use crate::domains::registration::actions::{send_otp, verify_otp};
use crate::domains::registration::{
    OtpVerificationResult, RegistrationError, SendOtpRequest, SendOtpResponse, VerifyOtpRequest,
};
use crate::server::app::AxumAppState;

/// `POST /auth/send-otp-email`
pub async fn send_otp_email_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<SendOtpResponse>, RegistrationError> {
    let response = send_otp(request, &state.server_deps).await?;
    Ok(Json(response))
}

/// `POST /auth/verify-otp-email`
///
/// On success the verified triple is forwarded to the identity provider to
/// create the durable account, then handed back to the client. The
/// `password` field of the triple is the stored bcrypt hash (see DESIGN.md).
pub async fn verify_otp_email_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<OtpVerificationResult>, RegistrationError> {
    let result = verify_otp(request, &state.server_deps).await?;

    if let (Some(email), Some(display_name), Some(password)) =
        (&result.email, &result.display_name, &result.password)
    {
        state
            .server_deps
            .identity
            .create_account(email, display_name, password)
            .await
            .map_err(|e| RegistrationError::internal("Failed to verify code", e))?;
    }

    Ok(Json(result))
}
