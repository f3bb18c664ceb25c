pub mod pending_registration;
pub mod queued_mail;

pub use pending_registration::PendingRegistration;
pub use queued_mail::{MailMessage, QueuedMail};
