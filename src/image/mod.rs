//! Registry data model
//!
//! Wire types decoded from registry responses ([`Catalog`], [`TagList`],
//! [`manifest::Manifest`], [`config::ImageConfig`]) and the aggregates built
//! from them ([`RepositoryInfo`], [`ImageInfo`]). Everything here is rebuilt
//! per request and never persisted.

pub mod config;
pub mod manifest;

pub use config::{ContainerConfig, HistoryEntry, ImageConfig, RootFs};
pub use manifest::{
    Descriptor, Manifest, ManifestDescriptor, ManifestList, ManifestResponse, Platform,
};

use serde::{Deserialize, Deserializer, Serialize};

/// `GET /v2/_catalog` body. Names are kept verbatim, duplicates included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_default")]
    pub repositories: Vec<String>,
}

/// `GET /v2/{name}/tags/list` body, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub tags: Vec<String>,
    pub tag_count: usize,
}

impl RepositoryInfo {
    pub fn from_tags(name: impl Into<String>, tags: TagList) -> Self {
        Self {
            name: name.into(),
            tag_count: tags.tags.len(),
            tags: tags.tags,
        }
    }
}

/// Manifest and config of one `repository:tag`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub name: String,
    pub tag: String,
    pub digest: String,
    pub manifest: Manifest,
    pub config: ImageConfig,
    pub total_size: u64,
    pub layer_count: usize,
}

impl ImageInfo {
    pub fn new(name: impl Into<String>, tag: impl Into<String>, manifest: Manifest, config: ImageConfig) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            digest: manifest.digest.clone(),
            total_size: manifest.total_size,
            layer_count: manifest.layer_count(),
            manifest,
            config,
        }
    }
}

// Registries answer `"tags": null` for repositories whose tags were all
// deleted, and config blobs carry nulls for unset fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
