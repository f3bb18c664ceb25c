// StubIdentityService - recording double for testing
//
// Provides an identity-provider stub that can be injected into ServerDeps
// for tests (integration tests live in a separate crate, so this module is
// part of the library rather than cfg(test)).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::kernel::BaseIdentityService;

/// Arguments captured from a create_account call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountCall {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Identity provider double that records calls and can be told to fail.
#[derive(Clone, Default)]
pub struct StubIdentityService {
    calls: Arc<Mutex<Vec<CreateAccountCall>>>,
    fail: Arc<Mutex<bool>>,
}

impl StubIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent create_account calls fail
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    /// Calls recorded so far
    pub fn calls(&self) -> Vec<CreateAccountCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseIdentityService for StubIdentityService {
    async fn create_account(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(anyhow!("stubbed identity provider failure"));
        }
        self.calls.lock().unwrap().push(CreateAccountCall {
            email: email.to_string(),
            display_name: display_name.to_string(),
            password: password.to_string(),
        });
        Ok(())
    }
}
