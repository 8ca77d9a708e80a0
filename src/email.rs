use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::VendorWelcomeRequest;

// 1. Mailer Contract
/// Mailer
///
/// Defines the abstract contract for the email-sending collaborator. The provider
/// accepts a structured template-parameter object and answers with an accepted
/// message id or an error; template rendering happens entirely on the provider
/// side. The trait lets us swap the real HTTP client (HttpMailer) for the
/// in-memory Mock (MockMailer) during testing without touching the handlers.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the vendor onboarding email. Returns the provider's message id on
    /// acceptance, or an error string describing the failure.
    async fn send_vendor_onboarding(&self, params: &VendorWelcomeRequest) -> Result<String, String>;
}

/// Minimal struct to deserialize the provider's acceptance response,
/// specifically capturing the queued message's id.
#[derive(Deserialize)]
struct ProviderSendResponse {
    id: String,
}

// 2. The Real Implementation (HTTP provider)
/// HttpMailer
///
/// The concrete implementation calling the email provider's REST endpoint.
/// One shared reqwest client is reused across requests; each send is an
/// independent request/response cycle with no retry or queuing.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    /// new
    ///
    /// Constructs the mailer using the endpoint and credentials from AppConfig.
    pub fn new(endpoint: &str, api_key: &str, from: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    /// send_vendor_onboarding
    ///
    /// Posts the template-parameter object to the provider. The template name is
    /// fixed; the parameters carry everything the template interpolates.
    async fn send_vendor_onboarding(
        &self,
        params: &VendorWelcomeRequest,
    ) -> Result<String, String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({
                "from": self.from,
                "to": params.vendor_email,
                "template": "vendor-onboarding",
                "params": {
                    "vendor_name": params.vendor_name,
                    "store_name": params.store_name,
                }
            }))
            .send()
            .await
            .map_err(|e| format!("email provider unreachable: {}", e))?;

        if !response.status().is_success() {
            // The provider rejected the send (bad template params, quota, etc.).
            return Err(format!("email provider returned {}", response.status()));
        }

        let accepted = response
            .json::<ProviderSendResponse>()
            .await
            .map_err(|e| format!("malformed provider response: {}", e))?;

        Ok(accepted.id)
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockMailer
///
/// A mock implementation of `Mailer` used exclusively for unit and integration
/// testing. Sends never leave the process; the handler logic around success and
/// failure mapping is what gets exercised.
#[derive(Clone)]
pub struct MockMailer {
    /// When true, all sends return a simulated provider failure.
    pub should_fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self { should_fail: false }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true }
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send_vendor_onboarding(
        &self,
        params: &VendorWelcomeRequest,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Mailer Error: Simulation requested".to_string());
        }

        // Deterministic, assertable message id derived from the recipient.
        Ok(format!("mock-msg-{}", params.vendor_email))
    }
}

/// MailerState
///
/// The concrete type used to share the mailer access across the application state.
pub type MailerState = Arc<dyn Mailer>;
