use async_trait::async_trait;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::ImageAuthParams;

type HmacSha256 = Hmac<Sha256>;

/// How long a set of generated upload auth parameters stays valid.
const AUTH_PARAMS_TTL_SECS: i64 = 600;

// 1. ImageHost Contract
/// ImageHost
///
/// Defines the abstract contract for the hosted image CDN. The platform never
/// proxies image bytes: browsers upload directly to the host using short-lived
/// auth parameters generated here, and the server only ever deletes files by
/// their host-assigned identifier. The trait allows swapping the real client
/// (ImageKitClient) for the in-memory Mock (MockImageHost) during testing.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Generates one-shot upload authentication parameters. Purely local
    /// computation; no request is made to the host.
    fn auth_params(&self) -> ImageAuthParams;

    /// Deletes a file by its host-assigned identifier. Ok(true) when deleted,
    /// Ok(false) when the host does not know the id, Err on transport or
    /// provider failure.
    async fn delete_file(&self, file_id: &str) -> Result<bool, String>;
}

// 2. The Real Implementation (ImageKit-style REST API)
/// ImageKitClient
///
/// The concrete implementation against the image host's management API,
/// configured by the three account secrets: public key (handed to browsers),
/// private key (signs auth parameters, authenticates management calls), and
/// the per-account URL endpoint media is served from.
#[derive(Clone)]
pub struct ImageKitClient {
    client: reqwest::Client,
    public_key: String,
    private_key: String,
    url_endpoint: String,
    api_base: String,
}

impl ImageKitClient {
    /// new
    ///
    /// Constructs the client using the secrets resolved by AppConfig.
    pub fn new(public_key: &str, private_key: &str, url_endpoint: &str, api_base: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            public_key: public_key.to_string(),
            private_key: private_key.to_string(),
            url_endpoint: url_endpoint.to_string(),
            api_base: api_base.to_string(),
        }
    }

    /// The public key browsers present alongside the generated auth parameters.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The delivery endpoint media URLs are rooted at.
    pub fn url_endpoint(&self) -> &str {
        &self.url_endpoint
    }

    /// sign
    ///
    /// Hex-encoded HMAC-SHA256 over token and expiry, keyed by the private key.
    /// Exposed for signature verification in tests.
    pub fn sign(&self, token: &str, expire: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.private_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        mac.update(expire.to_string().as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[async_trait]
impl ImageHost for ImageKitClient {
    /// auth_params
    ///
    /// A random single-use token, an absolute expiry, and the signature binding
    /// the two under the private key. The host recomputes the same HMAC on its
    /// side to authorize the upload.
    fn auth_params(&self) -> ImageAuthParams {
        let token = Uuid::new_v4().to_string();
        let expire = chrono::Utc::now().timestamp() + AUTH_PARAMS_TTL_SECS;
        let signature = self.sign(&token, expire);

        ImageAuthParams { token, expire, signature }
    }

    /// delete_file
    ///
    /// DELETE against the management API, authenticated with the private key.
    /// A 404 from the host is a distinct outcome (the caller answers 404, not 500).
    async fn delete_file(&self, file_id: &str) -> Result<bool, String> {
        let url = format!("{}/v1/files/{}", self.api_base, file_id);

        let response = self
            .client
            .delete(url)
            // Management API auth: private key as basic-auth username, empty password.
            .basic_auth(&self.private_key, Some(""))
            .send()
            .await
            .map_err(|e| format!("image host unreachable: {}", e))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }

        if !response.status().is_success() {
            return Err(format!("image host returned {}", response.status()));
        }

        Ok(true)
    }
}

// 3. The Mock Implementation (For Unit Tests)
/// MockImageHost
///
/// A mock implementation of `ImageHost` used exclusively for unit and
/// integration testing. Signatures are real (same HMAC construction, fixed test
/// key); deletion answers are canned.
#[derive(Clone)]
pub struct MockImageHost {
    /// When true, delete operations return a simulated transport failure.
    pub should_fail: bool,
    /// File id the mock pretends exists. Deleting anything else yields Ok(false).
    pub known_file_id: String,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self { should_fail: false, known_file_id: "file_known".to_string() }
    }

    pub fn new_failing() -> Self {
        Self { should_fail: true, known_file_id: "file_known".to_string() }
    }
}

impl Default for MockImageHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    fn auth_params(&self) -> ImageAuthParams {
        let token = Uuid::new_v4().to_string();
        let expire = chrono::Utc::now().timestamp() + AUTH_PARAMS_TTL_SECS;

        let mut mac = HmacSha256::new_from_slice(b"mock_private_key")
            .expect("HMAC accepts keys of any length");
        mac.update(token.as_bytes());
        mac.update(expire.to_string().as_bytes());

        ImageAuthParams { token, expire, signature: hex::encode(mac.finalize().into_bytes()) }
    }

    async fn delete_file(&self, file_id: &str) -> Result<bool, String> {
        if self.should_fail {
            return Err("Mock Image Host Error: Simulation requested".to_string());
        }

        Ok(file_id == self.known_file_id)
    }
}

/// ImageHostState
///
/// The concrete type used to share the image host access across the application
/// state.
pub type ImageHostState = Arc<dyn ImageHost>;
