//! Registry Browser Library
//!
//! Client for the read/delete surface of a Docker/OCI registry (Registry
//! HTTP API v2) plus the aggregation layer that turns catalogs and tag lists
//! into searchable, paginated views.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod image;
pub mod logging;
pub mod output;
pub mod registry;

pub use catalog::{CatalogService, PageRequest, PaginatedResult};
pub use config::{AuthConfig, RegistryConnection};
pub use connection::{ConnectionRegistry, ConnectionSource};
pub use error::{RegistryError, Result};
pub use logging::Logger;
pub use registry::{RegistryClient, RegistryClientBuilder};
