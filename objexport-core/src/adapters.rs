//! Org schema sources.
//!
//! [`SchemaSource`] is the connection capability the export pipeline is
//! handed. It exposes exactly the two describe operations the pipeline
//! needs; authentication has already happened by the time one exists.

use async_trait::async_trait;

use crate::Result;
use crate::models::{ObjectDescription, ObjectSummary};

pub mod config;
pub mod memory;
pub mod salesforce;

pub use config::{ConnectionConfig, DEFAULT_API_VERSION};
pub use memory::InMemorySource;
pub use salesforce::SalesforceAdapter;

/// Authenticated, read-only access to an org's object metadata.
///
/// # Object Safety
/// This trait is object-safe, allowing dynamic dispatch through
/// `Box<dyn SchemaSource>` or `&dyn SchemaSource`.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Lists every describable object in the org.
    ///
    /// The order of the returned sequence is the order the org reported
    /// and is preserved by the pipeline.
    ///
    /// # Errors
    /// Returns error if the request fails or the org rejects it
    async fn describe_global(&self) -> Result<Vec<ObjectSummary>>;

    /// Fetches the full describe document of one object.
    ///
    /// # Errors
    /// Returns error if the request fails or the org rejects it
    async fn describe_object(&self, name: &str) -> Result<ObjectDescription>;

    /// Human-readable org name for log lines (never contains credentials)
    fn org_label(&self) -> String;
}
