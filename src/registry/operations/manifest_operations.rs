//! Manifest operations for registry client
//!
//! Implements Docker Registry v2 and OCI manifest operations:
//! - Manifest download (GET /v2/{name}/manifests/{reference}) with the
//!   Docker v2, OCI manifest, OCI index and Docker list media types accepted
//! - Resolution of manifest lists / OCI indexes to a single platform
//! - Manifest deletion (DELETE /v2/{name}/manifests/{digest})

use crate::error::{RegistryError, Result};
use crate::image::manifest::{MANIFEST_ACCEPT, is_digest_reference};
use crate::image::{Manifest, ManifestResponse, Platform};
use crate::registry::transport::{DOCKER_CONTENT_DIGEST, Transport};
use reqwest::StatusCode;

#[derive(Clone)]
pub struct ManifestOperations {
    transport: Transport,
    platform: Platform,
}

impl ManifestOperations {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            platform: Platform::linux_amd64(),
        }
    }

    /// Platform chosen out of manifest lists (default `linux/amd64`)
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Fetch whatever the registry serves for `reference`, without resolving lists.
    pub async fn fetch_manifest(&self, repository: &str, reference: &str) -> Result<ManifestResponse> {
        let output = self.transport.output();
        output.verbose(&format!("Pulling manifest for {}:{}", repository, reference));

        let path = format!("/v2/{}/manifests/{}", repository, reference);
        let response = self
            .transport
            .get(&path, Some(MANIFEST_ACCEPT), "get manifest")
            .await?
            .expect_status(&[StatusCode::OK], "get manifest")?;

        let content_type = response.content_type().to_string();
        output.detail(&format!("Manifest type: {}", content_type));

        // The registry is the source of truth for content addressing.
        let digest = match response.header(DOCKER_CONTENT_DIGEST) {
            Some(digest) => digest.to_string(),
            None if is_digest_reference(reference) => reference.to_string(),
            None => {
                output.warning(&format!(
                    "Registry sent no {} header for {}:{}",
                    DOCKER_CONTENT_DIGEST, repository, reference
                ));
                String::new()
            }
        };

        ManifestResponse::decode(&response.body, &content_type, digest)
    }

    /// Resolve `reference` to a single-platform manifest.
    ///
    /// A manifest list is resolved by selecting one entry and fetching it by
    /// digest. Registries do not nest lists, so a second list is rejected.
    pub async fn get_manifest(&self, repository: &str, reference: &str) -> Result<Manifest> {
        match self.fetch_manifest(repository, reference).await? {
            ManifestResponse::Concrete(manifest) => Ok(manifest),
            ManifestResponse::Multi(list) => {
                let selected = list.select(&self.platform)?;
                self.transport.output().verbose(&format!(
                    "Manifest list for {}:{} resolved to {}",
                    repository, reference, selected.digest
                ));

                match self.fetch_manifest(repository, &selected.digest).await? {
                    ManifestResponse::Concrete(manifest) => Ok(manifest),
                    ManifestResponse::Multi(_) => Err(RegistryError::Decode(format!(
                        "manifest {} of {} is itself a manifest list",
                        selected.digest, repository
                    ))),
                }
            }
        }
    }

    /// Delete a manifest. Registries only accept digests here, not tags.
    pub async fn delete_manifest(&self, repository: &str, digest: &str) -> Result<()> {
        let output = self.transport.output();
        let path = format!("/v2/{}/manifests/{}", repository, digest);

        self.transport
            .delete(&path, "delete manifest")
            .await?
            .expect_status(&[StatusCode::OK, StatusCode::ACCEPTED], "delete manifest")
            .inspect_err(|e| output.error(&e.to_string()))?;

        output.success(&format!("Deleted manifest {}@{}", repository, digest));
        Ok(())
    }
}
