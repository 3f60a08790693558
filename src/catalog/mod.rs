//! Catalog and tag aggregation
//!
//! [`CatalogService`] composes registry calls into the views a browsing UI
//! needs: paginated, searchable repository and tag listings, full image
//! details, and deletion by tag.

pub mod pagination;

pub use pagination::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, PaginatedResult, filter_by_search, paginate,
};

use crate::connection::ConnectionSource;
use crate::error::{RegistryError, Result};
use crate::image::{Catalog, ImageConfig, ImageInfo, Manifest, RepositoryInfo};
use crate::logging::Logger;
use crate::registry::RegistryClient;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// One page of a repository's tags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPage {
    pub name: String,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct CatalogService {
    client: RegistryClient,
}

impl CatalogService {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Build a service against whatever connection `source` reports as active.
    pub async fn connect(source: &dyn ConnectionSource, output: Logger) -> Result<Self> {
        let connection = source.lookup_active_connection().await?;
        let client = RegistryClient::from_connection_with_logger(&connection, output)?;
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    pub async fn check_connection(&self) -> Result<()> {
        self.client.check_connection().await
    }

    pub async fn catalog(&self) -> Result<Catalog> {
        self.client.get_catalog().await
    }

    /// Filtered, paginated repositories, each carrying its tags.
    ///
    /// A repository whose tags cannot be read is left out of the page and
    /// counted in `skipped`; `total` still counts it.
    pub async fn list_repositories(
        &self,
        request: &PageRequest,
    ) -> Result<PaginatedResult<Vec<RepositoryInfo>>> {
        let catalog = self.client.get_catalog().await?;
        let filtered = filter_by_search(catalog.repositories, &request.search);
        let mut page = paginate(filtered, request);

        let names = std::mem::take(&mut page.data);
        let (repositories, skipped) = self.enrich(names).await;

        let mut result = page.map_data(|_| repositories);
        result.skipped = skipped;
        Ok(result)
    }

    async fn enrich(&self, names: Vec<String>) -> (Vec<RepositoryInfo>, usize) {
        let client = &self.client;
        let limit = names.len().clamp(1, MAX_PAGE_SIZE);

        let results: Vec<_> = stream::iter(names)
            .map(move |name| async move {
                let info = client.get_repository_info(&name).await;
                (name, info)
            })
            .buffered(limit)
            .collect()
            .await;

        let mut repositories = Vec::with_capacity(results.len());
        let mut skipped = 0;
        for (name, info) in results {
            match info {
                Ok(info) => repositories.push(info),
                Err(e) => {
                    skipped += 1;
                    client
                        .logger()
                        .warning(&format!("Skipping repository {}: {}", name, e));
                }
            }
        }
        (repositories, skipped)
    }

    /// Filtered, paginated tags of one repository.
    pub async fn list_tags(
        &self,
        repository: &str,
        request: &PageRequest,
    ) -> Result<PaginatedResult<TagPage>> {
        require("repo", repository)?;

        let tags = self.client.get_tags(repository).await?;
        let filtered = filter_by_search(tags.tags, &request.search);
        Ok(paginate(filtered, request).map_data(|tags| TagPage {
            name: repository.to_string(),
            tags,
        }))
    }

    pub async fn manifest(&self, repository: &str, reference: &str) -> Result<Manifest> {
        require("repo", repository)?;
        require("ref", reference)?;
        self.client.get_manifest(repository, reference).await
    }

    pub async fn image_info(&self, repository: &str, tag: &str) -> Result<ImageInfo> {
        require("repo", repository)?;
        require("tag", tag)?;
        self.client.get_image_info(repository, tag).await
    }

    pub async fn image_config(&self, repository: &str, digest: &str) -> Result<ImageConfig> {
        require("repo", repository)?;
        require("digest", digest)?;
        self.client.get_image_config(repository, digest).await
    }

    /// Delete the image `reference` points at and return its digest.
    ///
    /// Registries only delete by digest, so the reference is resolved first;
    /// nothing is deleted when resolution fails.
    pub async fn delete_image(&self, repository: &str, reference: &str) -> Result<String> {
        require("repo", repository)?;
        require("ref", reference)?;

        let manifest = self.client.get_manifest(repository, reference).await?;
        if manifest.digest.is_empty() {
            return Err(RegistryError::NotFound(format!(
                "registry reported no digest for {}:{}",
                repository, reference
            )));
        }

        self.client
            .delete_manifest(repository, &manifest.digest)
            .await?;
        Ok(manifest.digest)
    }
}

fn require(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(RegistryError::Validation(format!(
            "{} parameter is required",
            name
        )))
    } else {
        Ok(())
    }
}
