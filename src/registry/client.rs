//! Registry client for the Docker Registry HTTP API v2
//!
//! [`RegistryClient`] is built per connection and holds no state between
//! calls beyond its transport, so it can be shared or recreated freely.

use crate::config::{AuthConfig, DEFAULT_TIMEOUT_SECS, RegistryConnection};
use crate::error::{RegistryError, Result};
use crate::image::{Catalog, ImageConfig, ImageInfo, Manifest, Platform, RepositoryInfo, TagList};
use crate::logging::Logger;
use crate::registry::operations::{BlobOperations, ManifestOperations, RepositoryOperations};
use crate::registry::transport::Transport;
use reqwest::StatusCode;
use std::time::Duration;

pub struct RegistryClientBuilder {
    address: String,
    auth_config: Option<AuthConfig>,
    timeout: Duration,
    verify_tls: bool,
    platform: Platform,
    output: Logger,
}

impl RegistryClientBuilder {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            auth_config: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verify_tls: false,
            platform: Platform::linux_amd64(),
            output: Logger::default(),
        }
    }

    pub fn with_auth(mut self, auth_config: Option<AuthConfig>) -> Self {
        self.auth_config = auth_config;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = verify_tls;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_logger(mut self, output: Logger) -> Self {
        self.output = output;
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        if self.address.trim().is_empty() {
            return Err(RegistryError::Validation(
                "registry address cannot be empty".to_string(),
            ));
        }

        let transport = Transport::new(
            &self.address,
            self.auth_config,
            self.timeout,
            self.verify_tls,
            self.output,
        )?;

        Ok(RegistryClient {
            repositories: RepositoryOperations::new(transport.clone()),
            manifests: ManifestOperations::new(transport.clone()).with_platform(self.platform),
            blobs: BlobOperations::new(transport.clone()),
            transport,
        })
    }
}

#[derive(Clone)]
pub struct RegistryClient {
    transport: Transport,
    repositories: RepositoryOperations,
    manifests: ManifestOperations,
    blobs: BlobOperations,
}

impl RegistryClient {
    pub fn builder(address: impl Into<String>) -> RegistryClientBuilder {
        RegistryClientBuilder::new(address)
    }

    pub fn from_connection(connection: &RegistryConnection) -> Result<Self> {
        Self::from_connection_with_logger(connection, Logger::default())
    }

    pub fn from_connection_with_logger(connection: &RegistryConnection, output: Logger) -> Result<Self> {
        connection.validate()?;
        Self::builder(connection.base_url())
            .with_auth(connection.credentials())
            .with_timeout(connection.timeout())
            .with_verify_tls(connection.verify_tls)
            .with_logger(output)
            .build()
    }

    pub fn address(&self) -> &str {
        self.transport.address()
    }

    pub fn logger(&self) -> &Logger {
        self.transport.output()
    }

    /// `GET /v2/`. A 401 still proves a registry is listening.
    pub async fn check_connection(&self) -> Result<()> {
        let response = self.transport.get("/v2/", None, "connection check").await?;

        match response.status {
            StatusCode::OK => {
                self.logger().verbose("Registry API v2 is available");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => {
                self.logger().verbose("Registry API v2 is available and requires authentication");
                Ok(())
            }
            status => Err(RegistryError::UnexpectedStatus {
                operation: "connect to registry".to_string(),
                status: status.as_u16(),
                body: response.body_text(),
            }),
        }
    }

    pub async fn get_catalog(&self) -> Result<Catalog> {
        self.repositories.catalog().await
    }

    pub async fn get_tags(&self, repository: &str) -> Result<TagList> {
        self.repositories.list_tags(repository).await
    }

    /// Resolve `reference` (tag or digest) to one concrete manifest
    pub async fn get_manifest(&self, repository: &str, reference: &str) -> Result<Manifest> {
        self.manifests.get_manifest(repository, reference).await
    }

    pub async fn get_image_config(&self, repository: &str, digest: &str) -> Result<ImageConfig> {
        self.blobs.get_image_config(repository, digest).await
    }

    pub async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()> {
        self.manifests.delete_manifest(repository, digest).await
    }

    /// Manifest and config of `repository:tag`; the first failure aborts.
    pub async fn get_image_info(&self, repository: &str, tag: &str) -> Result<ImageInfo> {
        let manifest = self.get_manifest(repository, tag).await?;
        let config = self
            .get_image_config(repository, &manifest.config.digest)
            .await?;
        Ok(ImageInfo::new(repository, tag, manifest, config))
    }

    pub async fn get_repository_info(&self, repository: &str) -> Result<RepositoryInfo> {
        let tags = self.get_tags(repository).await?;
        Ok(RepositoryInfo::from_tags(repository, tags))
    }
}
