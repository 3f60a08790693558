//! Registry module for Docker registry interactions
//!
//! This module speaks the Docker Registry HTTP API v2 read/delete surface:
//! connection checks, catalog and tag listing, manifest resolution, config
//! blobs and manifest deletion. Authentication is HTTP Basic only.

pub mod client;
pub mod operations;
pub mod transport;

pub use crate::config::AuthConfig;
pub use client::{RegistryClient, RegistryClientBuilder};
pub use transport::Transport;
