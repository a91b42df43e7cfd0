use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

use crate::builder::{HttpMethod, RequestDescriptor, SignedRequest};
use crate::config::{ApiConfig, Credentials};
use crate::error::{Error, Result};
use crate::parameters::ParameterMap;
use crate::v1::Entropy;

const USER_AGENT: &str = concat!("twads/", env!("CARGO_PKG_VERSION"));

/// OAuth V1 signed HTTP client. Every call signs a fresh request and issues
/// it on its own; nothing is retried.
#[derive(Clone)]
pub struct OAuthV1Client {
    http: reqwest::Client,
    api: ApiConfig,
    credentials: Credentials,
    entropy: Arc<dyn Entropy>,
}

impl OAuthV1Client {
    pub fn new(
        api: ApiConfig,
        credentials: Credentials,
        entropy: Arc<dyn Entropy>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| Error::Api(format!("failed to build HTTP client: {}", err)))?;
        Ok(OAuthV1Client {
            http,
            api,
            credentials,
            entropy,
        })
    }

    pub fn entropy(&self) -> &dyn Entropy {
        self.entropy.as_ref()
    }

    /// Resolves `endpoint` (a path such as `/accounts/abc`) against the
    /// configured API base, keeping the base's own path prefix.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let base = self.api.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, endpoint))?)
    }

    /// Builds and signs a request without sending it.
    pub fn prepare(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: ParameterMap,
    ) -> Result<SignedRequest> {
        let url = self.endpoint_url(endpoint)?;
        RequestDescriptor::new(method, url, params).sign(
            &self.credentials,
            self.entropy.as_ref(),
            self.api.body_signing,
        )
    }

    pub async fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        params: ParameterMap,
    ) -> Result<Value> {
        let request = self.prepare(method, endpoint, params)?;
        self.execute(request).await
    }

    pub async fn get(&self, endpoint: &str, params: ParameterMap) -> Result<Value> {
        self.request(HttpMethod::Get, endpoint, params).await
    }

    pub async fn post(&self, endpoint: &str, params: ParameterMap) -> Result<Value> {
        self.request(HttpMethod::Post, endpoint, params).await
    }

    pub async fn put(&self, endpoint: &str, params: ParameterMap) -> Result<Value> {
        self.request(HttpMethod::Put, endpoint, params).await
    }

    /// Sends a signed request and decodes the JSON reply.
    pub async fn execute(&self, request: SignedRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, url = %request.url, "sending signed request");

        let mut builder = self
            .http
            .request(request.method.into(), request.url)
            .header(AUTHORIZATION, request.authorization)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| Error::Api(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| Error::Api(err.to_string()))?;
        tracing::debug!(%status, len = bytes.len(), "received response");

        if !status.is_success() {
            return Err(Error::Api(error_message(status, &bytes)));
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes)
            .map_err(|err| Error::Api(format!("malformed JSON in response: {}", err)))
    }
}

/// Picks the API's own first error message, falling back to the status.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/errors/0/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| format!("request failed with status {}", status))
}
