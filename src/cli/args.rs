//! Command-line argument parsing

use crate::catalog::PageRequest;
use crate::config::{DEFAULT_TIMEOUT_SECS, RegistryConnection};
use crate::output::OutputFormat;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "registry-browser")]
#[command(about = "Browse, inspect and prune images in a Docker/OCI registry")]
#[command(version)]
pub struct Args {
    /// Registry base URL
    #[arg(long = "url", short = 'r', env = "REGISTRY_URL", global = true)]
    pub url: Option<String>,

    /// Registry username
    #[arg(long = "username", short = 'u', env = "REGISTRY_USERNAME", global = true)]
    pub username: Option<String>,

    /// Registry password
    #[arg(
        long = "password",
        short = 'p',
        env = "REGISTRY_PASSWORD",
        hide_env_values = true,
        global = true
    )]
    pub password: Option<String>,

    /// Verify the registry's TLS certificate
    #[arg(long = "verify-tls", env = "REGISTRY_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Timeout in seconds for each registry request
    #[arg(
        long = "timeout",
        short = 't',
        env = "REGISTRY_TIMEOUT",
        default_value_t = DEFAULT_TIMEOUT_SECS,
        global = true
    )]
    pub timeout: u64,

    /// Output format
    #[arg(long = "output", short = 'o', value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub output: OutputFormat,

    /// Verbose logging on stderr
    #[arg(long = "verbose", short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct PageArgs {
    /// 1-based page number
    #[arg(long = "page")]
    pub page: Option<String>,

    /// Items per page (1-100)
    #[arg(long = "page-size")]
    pub page_size: Option<String>,

    /// Case-insensitive substring filter
    #[arg(long = "search", short = 's')]
    pub search: Option<String>,
}

impl PageArgs {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::from_query(
            self.page.as_deref(),
            self.page_size.as_deref(),
            self.search.as_deref(),
        )
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Check that the URL answers as a registry
    Check,
    /// Print the raw repository catalog
    Catalog,
    /// List repositories with their tag counts
    Repos {
        #[command(flatten)]
        paging: PageArgs,
    },
    /// List the tags of a repository
    Tags {
        repository: String,
        #[command(flatten)]
        paging: PageArgs,
    },
    /// Show the resolved manifest of a tag or digest
    Manifest { repository: String, reference: String },
    /// Show manifest and configuration of an image
    Info { repository: String, tag: String },
    /// Show a config blob by digest
    Config { repository: String, digest: String },
    /// Delete the manifest a tag or digest points at
    Delete { repository: String, reference: String },
}

impl Args {
    /// Connection described by the global flags.
    pub fn connection(&self) -> Result<RegistryConnection, String> {
        let url = self
            .url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| "registry URL is required (--url or REGISTRY_URL)".to_string())?;

        let mut connection = RegistryConnection::new(url)
            .with_verify_tls(self.verify_tls)
            .with_timeout_secs(self.timeout);
        connection.username = self.username.clone();
        connection.password = self.password.clone();

        connection.validate().map_err(|e| e.to_string())?;
        Ok(connection)
    }
}
