//! Registry operations grouped by resource
//!
//! Each group shares the connection's [`Transport`](crate::registry::transport::Transport);
//! [`RegistryClient`](crate::registry::RegistryClient) composes them.

pub mod blob_operations;
pub mod manifest_operations;
pub mod repository_operations;

pub use blob_operations::BlobOperations;
pub use manifest_operations::ManifestOperations;
pub use repository_operations::RepositoryOperations;
