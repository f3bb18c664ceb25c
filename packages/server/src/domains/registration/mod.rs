//! Registration domain - email OTP gate in front of account creation
//!
//! Flow: client → send-otp-email → pending record + queued mail;
//! client → verify-otp-email → record consumed, verified triple handed to
//! account creation. An hourly sweep reaps whatever never completes.
//!
//! Responsibilities:
//! - Pending-registration state machine (one record per email)
//! - Anti-abuse rules: resend cap, cooldown, wrong-code budget
//! - Bounded lifetime of unverified state

pub mod actions;
pub mod errors;
pub mod models;
pub mod otp;
pub mod types;

pub use errors::RegistrationError;
pub use types::{OtpVerificationResult, SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
