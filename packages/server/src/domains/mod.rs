// Business domains
pub mod registration;
