//! Runs one subcommand against the configured registry

use crate::catalog::CatalogService;
use crate::cli::args::{Args, Command};
use crate::error::{RegistryError, Result};
use crate::logging::Logger;
use crate::output::{self, OutputFormat};
use serde::Serialize;
use std::time::Instant;

pub struct Runner {
    args: Args,
    output: Logger,
}

impl Runner {
    pub fn new(args: Args) -> Self {
        let output = Logger::new(args.verbose);
        Self { args, output }
    }

    /// Execute the subcommand and return what should be printed on stdout.
    pub async fn run(&self) -> Result<String> {
        let start_time = Instant::now();

        let connection = self.args.connection().map_err(RegistryError::Validation)?;
        self.output
            .verbose(&format!("Using registry {}", connection.base_url()));

        let service = CatalogService::connect(&connection, self.output.clone()).await?;
        let rendered = self.dispatch(&service).await?;

        self.output.verbose(&format!(
            "Completed in {}",
            self.output.format_duration(start_time.elapsed())
        ));
        Ok(rendered)
    }

    async fn dispatch(&self, service: &CatalogService) -> Result<String> {
        let format = self.args.output;

        match &self.args.command {
            Command::Check => {
                service.check_connection().await?;
                let status = ConnectionStatus {
                    message: "Connection successful".to_string(),
                    connected: true,
                };
                render(format, &status, |s| format!("{}\n", s.message))
            }
            Command::Catalog => {
                let catalog = service.catalog().await?;
                render(format, &catalog, output::catalog_text)
            }
            Command::Repos { paging } => {
                let page = service.list_repositories(&paging.to_request()).await?;
                render(format, &page, output::repositories_text)
            }
            Command::Tags { repository, paging } => {
                let page = service.list_tags(repository, &paging.to_request()).await?;
                render(format, &page, output::tags_text)
            }
            Command::Manifest {
                repository,
                reference,
            } => {
                let manifest = service.manifest(repository, reference).await?;
                render(format, &manifest, output::manifest_text)
            }
            Command::Info { repository, tag } => {
                let info = service.image_info(repository, tag).await?;
                render(format, &info, output::image_info_text)
            }
            Command::Config { repository, digest } => {
                let config = service.image_config(repository, digest).await?;
                render(format, &config, output::config_text)
            }
            Command::Delete {
                repository,
                reference,
            } => {
                let digest = service.delete_image(repository, reference).await?;
                let deleted = Deleted {
                    message: "Image deleted successfully".to_string(),
                    repository: repository.clone(),
                    digest,
                };
                render(format, &deleted, |d| {
                    format!("Deleted {}@{}\n", d.repository, d.digest)
                })
            }
        }
    }
}

#[derive(Serialize)]
struct ConnectionStatus {
    message: String,
    connected: bool,
}

#[derive(Serialize)]
struct Deleted {
    message: String,
    repository: String,
    digest: String,
}

fn render<T, F>(format: OutputFormat, value: &T, text: F) -> Result<String>
where
    T: Serialize,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => output::to_json(value).map(|json| json + "\n"),
        OutputFormat::Text => Ok(text(value)),
    }
}
