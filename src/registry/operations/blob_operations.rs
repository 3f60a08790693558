//! Blob operations for registry client
//!
//! Only the image config blob is read (GET /v2/{name}/blobs/{digest}); layer
//! contents are never downloaded.

use crate::error::Result;
use crate::image::ImageConfig;
use crate::registry::transport::Transport;
use reqwest::StatusCode;

#[derive(Clone)]
pub struct BlobOperations {
    transport: Transport,
}

impl BlobOperations {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    /// Download and decode the image config blob
    pub async fn get_image_config(&self, repository: &str, digest: &str) -> Result<ImageConfig> {
        self.transport
            .output()
            .verbose(&format!("Fetching config blob {} from {}", digest, repository));

        let path = format!("/v2/{}/blobs/{}", repository, digest);
        let response = self
            .transport
            .get(&path, None, "get config")
            .await?
            .expect_status(&[StatusCode::OK], "get config")?;

        response.json("image config")
    }
}
