//! Repository operations for registry client
//!
//! Implements Docker Registry v2 repository-level operations:
//! - Catalog listing (GET /v2/_catalog)
//! - Tag listing (GET /v2/{name}/tags/list)

use crate::error::Result;
use crate::image::{Catalog, TagList};
use crate::registry::transport::Transport;
use reqwest::StatusCode;

#[derive(Clone)]
pub struct RepositoryOperations {
    transport: Transport,
}

impl RepositoryOperations {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// List every repository the registry reports
    pub async fn catalog(&self) -> Result<Catalog> {
        let output = self.transport.output();
        output.verbose("Fetching repository catalog");

        let response = self
            .transport
            .get("/v2/_catalog", None, "get catalog")
            .await?
            .expect_status(&[StatusCode::OK], "get catalog")?;

        let catalog: Catalog = response.json("catalog")?;
        output.verbose(&format!(
            "Catalog lists {} repositories",
            catalog.repositories.len()
        ));
        Ok(catalog)
    }

    /// List all tags in repository using Docker Registry v2 API
    pub async fn list_tags(&self, repository: &str) -> Result<TagList> {
        let output = self.transport.output();
        output.verbose(&format!("Listing tags for repository: {}", repository));

        let path = format!("/v2/{}/tags/list", repository);
        let response = self
            .transport
            .get(&path, None, "get tags")
            .await?
            .expect_status(&[StatusCode::OK], "get tags")?;

        let tags: TagList = response.json("tag list")?;
        output.verbose(&format!(
            "Found {} tags for repository {}",
            tags.tags.len(),
            repository
        ));
        Ok(tags)
    }
}
