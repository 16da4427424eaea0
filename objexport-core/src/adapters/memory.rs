//! In-memory schema source.
//!
//! Serves a fixed catalog without any network access. Used by the test
//! suites of both crates to drive the pipeline deterministically, with
//! optional failure injection for the global listing or a single object.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::Result;
use crate::adapters::SchemaSource;
use crate::error::ObjExportError;
use crate::models::{ObjectDescription, ObjectSummary};

/// Catalog held in memory.
///
/// Every call is recorded so tests can assert on which objects were
/// described and in what order.
#[derive(Debug, Default)]
pub struct InMemorySource {
    label: String,
    catalog: Vec<ObjectSummary>,
    documents: HashMap<String, ObjectDescription>,
    fail_global: bool,
    fail_objects: Vec<String>,
    calls: Mutex<Vec<String>>,
}

/// Call log entry recorded for the global listing
pub const GLOBAL_CALL: &str = "<global>";

impl InMemorySource {
    /// Empty catalog.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Adds an object and its describe document.
    pub fn with_object(
        mut self,
        summary: ObjectSummary,
        description: impl Into<ObjectDescription>,
    ) -> Self {
        self.documents
            .insert(summary.name.clone(), description.into());
        self.catalog.push(summary);
        self
    }

    /// Adds an object whose describe document is `{"name": .., "label": ..}`.
    pub fn with_summary(self, name: &str, label: &str) -> Self {
        let document = serde_json::json!({ "name": name, "label": label });
        self.with_object(ObjectSummary::new(name, label), document)
    }

    /// Makes the global listing fail.
    pub const fn failing_global(mut self) -> Self {
        self.fail_global = true;
        self
    }

    /// Makes the describe of `name` fail.
    pub fn failing_object(mut self, name: impl Into<String>) -> Self {
        self.fail_objects.push(name.into());
        self
    }

    /// Calls made so far, in order ([`GLOBAL_CALL`] for the listing).
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Object names described so far, in order.
    pub fn described(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call != GLOBAL_CALL)
            .collect()
    }

    fn record(&self, call: &str) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.to_string());
        }
    }
}

#[async_trait]
impl SchemaSource for InMemorySource {
    async fn describe_global(&self) -> Result<Vec<ObjectSummary>> {
        self.record(GLOBAL_CALL);
        if self.fail_global {
            return Err(ObjExportError::describe_failed(
                "global",
                503,
                "SERVER_UNAVAILABLE",
                "In-memory catalog configured to fail",
            ));
        }
        Ok(self.catalog.clone())
    }

    async fn describe_object(&self, name: &str) -> Result<ObjectDescription> {
        self.record(name);
        if self.fail_objects.iter().any(|failing| failing == name) {
            return Err(ObjExportError::describe_failed(
                name,
                500,
                "UNKNOWN_EXCEPTION",
                "In-memory catalog configured to fail",
            ));
        }
        self.documents.get(name).cloned().ok_or_else(|| {
            ObjExportError::describe_failed(
                name,
                404,
                "NOT_FOUND",
                "The requested resource does not exist",
            )
        })
    }

    fn org_label(&self) -> String {
        self.label.clone()
    }
}
