//! Core data structures and the export pipeline for objexport.
//!
//! This crate provides the types, traits, and utilities the `objexport`
//! binary is built from: the sobject data model, org credential resolution,
//! the Salesforce describe client, and the YAML writers.
//!
//! # Guarantees
//! - Only the read-only describe endpoints are ever called
//! - Access tokens are never stored in data structures that get logged or serialized
//! - No object is described twice, and output is only written once the
//!   collection it depends on is complete
//!
//! # Architecture
//! - [`adapters::SchemaSource`] abstracts the org connection so the pipeline
//!   can run against Salesforce or an in-memory catalog
//! - [`export::run`] is the single entry point the CLI harness calls
//! - [`messages::Messages`] is the explicit table of user-facing strings

pub mod adapters;
pub mod auth;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod messages;
pub mod models;
pub mod output;

// Re-export commonly used types
pub use adapters::{ConnectionConfig, InMemorySource, SalesforceAdapter, SchemaSource};
pub use auth::{AccessToken, CredentialSource, ExplicitCredentials, OrgAuth, OrgResolver};
pub use error::{ObjExportError, Result};
pub use export::{ExportConfig, OutputTarget, collect_descriptions, run};
pub use filter::ObjectFilter;
pub use logging::{LogFormat, init_logging};
pub use messages::Messages;
pub use models::{DescriptionCollection, ObjectDescription, ObjectSummary};
