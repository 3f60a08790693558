//! Docker v2 / OCI manifest wire types
//!
//! A registry answers a manifest request either with a single-platform
//! manifest or with a multi-platform envelope (Docker manifest list or OCI
//! index). [`ManifestResponse`] captures that split; callers only ever see a
//! resolved [`Manifest`].

use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};

pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const DOCKER_MANIFEST_LIST_V2: &str =
    "application/vnd.docker.distribution.manifest.list.v2+json";
pub const OCI_IMAGE_MANIFEST: &str = "application/vnd.oci.image.manifest.v1+json";
pub const OCI_IMAGE_INDEX: &str = "application/vnd.oci.image.index.v1+json";

/// `Accept` header for manifest requests, in order of preference.
pub const MANIFEST_ACCEPT: &str = "application/vnd.docker.distribution.manifest.v2+json, \
     application/vnd.oci.image.manifest.v1+json, \
     application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.list.v2+json";

/// Media type without parameters such as `; charset=utf-8`.
pub fn media_type_essence(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// True for Docker manifest lists and OCI indexes.
pub fn is_manifest_list(content_type: &str) -> bool {
    let essence = media_type_essence(content_type);
    essence.eq_ignore_ascii_case(DOCKER_MANIFEST_LIST_V2) || essence.eq_ignore_ascii_case(OCI_IMAGE_INDEX)
}

/// Content descriptor of the config blob or a layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub digest: String,
}

/// A resolved single-platform image manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub schema_version: u32,
    /// Set from the response `Content-Type`, not from the body
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub config: Descriptor,
    #[serde(default)]
    pub layers: Vec<Descriptor>,
    /// Set from the `Docker-Content-Digest` response header
    #[serde(default)]
    pub digest: String,
    #[serde(default)]
    pub total_size: u64,
}

impl Manifest {
    /// Config blob size plus every layer size.
    pub fn compute_total_size(&self) -> u64 {
        self.layers
            .iter()
            .fold(self.config.size, |acc, layer| acc.saturating_add(layer.size))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub os: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Platform {
    pub fn new(os: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            architecture: architecture.into(),
            os: os.into(),
            variant: None,
        }
    }

    /// Platform preferred when resolving a manifest list.
    pub fn linux_amd64() -> Self {
        Self::new("linux", "amd64")
    }

    fn matches(&self, other: &Platform) -> bool {
        self.os == other.os && self.architecture == other.architecture
    }
}

/// Entry of a manifest list / OCI index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDescriptor {
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub size: u64,
    pub digest: String,
    #[serde(default)]
    pub platform: Option<Platform>,
}

/// Multi-platform manifest envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestList {
    #[serde(default)]
    pub schema_version: u32,
    #[serde(default)]
    pub media_type: String,
    #[serde(default)]
    pub manifests: Vec<ManifestDescriptor>,
}

impl ManifestList {
    /// Pick the descriptor for `preferred`, falling back to the first entry.
    pub fn select(&self, preferred: &Platform) -> Result<&ManifestDescriptor> {
        self.manifests
            .iter()
            .find(|m| m.platform.as_ref().is_some_and(|p| p.matches(preferred)))
            .or_else(|| self.manifests.first())
            .ok_or_else(|| {
                RegistryError::NotFound("no suitable manifest found in manifest list".to_string())
            })
    }
}

/// Manifest endpoint answer, dispatched on the response `Content-Type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestResponse {
    Concrete(Manifest),
    Multi(ManifestList),
}

impl ManifestResponse {
    /// Decode a manifest body. `digest` is the registry-reported content
    /// digest; it is never computed from the body.
    pub fn decode(body: &[u8], content_type: &str, digest: String) -> Result<Self> {
        if is_manifest_list(content_type) {
            let list: ManifestList = serde_json::from_slice(body)
                .map_err(|e| RegistryError::Decode(format!("invalid manifest list: {}", e)))?;
            return Ok(ManifestResponse::Multi(list));
        }

        let mut manifest: Manifest = serde_json::from_slice(body)
            .map_err(|e| RegistryError::Decode(format!("invalid manifest: {}", e)))?;
        manifest.digest = digest;
        manifest.media_type = content_type.to_string();
        manifest.total_size = manifest.compute_total_size();
        Ok(ManifestResponse::Concrete(manifest))
    }
}

/// True for references of the form `algorithm:encoded`, as opposed to tags.
pub fn is_digest_reference(reference: &str) -> bool {
    match reference.split_once(':') {
        Some((algorithm, encoded)) => {
            !algorithm.is_empty()
                && !encoded.is_empty()
                && algorithm
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+._-".contains(c))
                && encoded
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "=_-".contains(c))
        }
        None => false,
    }
}
