//! HTTP transport for the Docker Registry API v2
//!
//! Wraps a `reqwest` client configured once per connection: a fixed request
//! timeout, optional certificate verification, and HTTP Basic credentials
//! attached to every request when present.

use crate::config::{AuthConfig, RegistryConnection};
use crate::error::handlers::{HttpErrorHandler, NetworkErrorHandler};
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// Buffered registry response
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> &str {
        self.header(CONTENT_TYPE.as_str()).unwrap_or("")
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self, what: &str) -> Result<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| RegistryError::Decode(format!("invalid {} response: {}", what, e)))
    }

    /// Fail with the status and raw body unless the status is accepted.
    pub fn expect_status(self, accepted: &[StatusCode], operation: &str) -> Result<Self> {
        if accepted.contains(&self.status) {
            Ok(self)
        } else {
            let body = self.body_text();
            Err(HttpErrorHandler::unexpected_status(self.status, body, operation))
        }
    }
}

#[derive(Clone, Debug)]
pub struct Transport {
    client: Client,
    address: String,
    auth: Option<AuthConfig>,
    verify_tls: bool,
    output: Logger,
}

impl Transport {
    pub fn new(
        address: &str,
        auth: Option<AuthConfig>,
        timeout: Duration,
        verify_tls: bool,
        output: Logger,
    ) -> Result<Self> {
        let mut builder = Client::builder().timeout(timeout);
        if !verify_tls {
            builder = builder
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true);
        }
        let client = builder
            .build()
            .map_err(|e| RegistryError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            address: address.trim_end_matches('/').to_string(),
            auth,
            verify_tls,
            output,
        })
    }

    pub fn from_connection(connection: &RegistryConnection, output: Logger) -> Result<Self> {
        Self::new(
            connection.base_url(),
            connection.credentials(),
            connection.timeout(),
            connection.verify_tls,
            output,
        )
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// False when invalid certificates and host names are accepted
    pub fn verifies_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn output(&self) -> &Logger {
        &self.output
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, accept: Option<&str>, context: &str) -> Result<RawResponse> {
        self.send(Method::GET, path, accept, context).await
    }

    pub async fn delete(&self, path: &str, context: &str) -> Result<RawResponse> {
        self.send(Method::DELETE, path, None, context).await
    }

    /// Issue one request and buffer the whole response. Any status is
    /// returned; only transport failures are errors here.
    async fn send(
        &self,
        method: Method,
        path: &str,
        accept: Option<&str>,
        context: &str,
    ) -> Result<RawResponse> {
        let url = self.url(path);
        self.output.debug(&format!("{} {}", method, url));

        let mut request = self.client.request(method, &url);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }

        let response = request.send().await.map_err(|e| {
            self.output.warning(&format!("{} failed: {}", context, e));
            NetworkErrorHandler::handle_network_error(&e, context)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| NetworkErrorHandler::handle_network_error(&e, context))?
            .to_vec();

        self.output
            .detail(&format!("{} -> {} ({} bytes)", context, status, body.len()));

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
