use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::kernel::BaseIdentityService;

/// HTTP adapter to the vendor identity provider.
///
/// Posts the verified triple to the provider's account-creation endpoint.
pub struct HttpIdentityService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountRequest<'a> {
    email: &'a str,
    display_name: &'a str,
    password: &'a str,
}

impl HttpIdentityService {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl BaseIdentityService for HttpIdentityService {
    async fn create_account(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<()> {
        let body = CreateAccountRequest {
            email,
            display_name,
            password,
        };

        let mut request = self
            .client
            .post(format!("{}/accounts", self.base_url))
            .json(&body);

        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Identity provider rejected account creation ({}): {}",
                status,
                detail
            ));
        }

        info!(email = %email, "Account created with identity provider");
        Ok(())
    }
}
