// Email OTP Registration Gate - API Core
//
// Backend for the mobile signup flow: issues one-time email codes, verifies
// them against pending registrations, and sweeps stale state on a schedule.
// The durable account is only created (by the external identity provider)
// after the email is proven.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
