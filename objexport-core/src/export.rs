//! The export pipeline.
//!
//! One linear run per invocation:
//! 1. Resolve the output target
//! 2. Global describe
//! 3. For each listed object, in listing order: print the progress line,
//!    apply the filter, describe the object if included
//! 4. Write the combined file or the per-object files
//! 5. Hand the collection back to the caller
//!
//! Remote calls are issued one at a time and awaited before the next. Any
//! error aborts the run; nothing is written before step 4.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::Result;
use crate::adapters::SchemaSource;
use crate::error::ObjExportError;
use crate::filter::ObjectFilter;
use crate::messages::Messages;
use crate::models::DescriptionCollection;
use crate::output;

/// Default output file in combined mode
pub const DEFAULT_COMBINED_OUTPUT: &str = "object-schema.yaml";
/// Default output directory in split mode
pub const DEFAULT_SPLIT_OUTPUT: &str = "object-schema";

/// Settings for one export run, fixed before the run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    /// Output file (combined) or directory (split); defaulted when absent
    pub output: Option<PathBuf>,
    /// Case-insensitive name/label substring
    pub filter: Option<String>,
    /// Accepted for compatibility; output is always overwritten
    pub force: bool,
    /// One file per object instead of one combined file
    pub split: bool,
    /// Username or alias of the org being exported
    pub target_org: Option<String>,
}

impl ExportConfig {
    /// Config with every option at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Builder method to set the filter substring.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builder method to set the force flag.
    pub const fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Builder method to enable split mode.
    pub const fn with_split(mut self, split: bool) -> Self {
        self.split = split;
        self
    }

    /// Builder method to set the target org.
    pub fn with_target_org(mut self, target_org: impl Into<String>) -> Self {
        self.target_org = Some(target_org.into());
        self
    }

    /// Where output goes, with defaults applied.
    pub fn output_target(&self) -> OutputTarget {
        if self.split {
            OutputTarget::Split(
                self.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SPLIT_OUTPUT)),
            )
        } else {
            OutputTarget::Combined(
                self.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_COMBINED_OUTPUT)),
            )
        }
    }

    /// The filter built from [`filter`](Self::filter).
    pub fn object_filter(&self) -> ObjectFilter {
        ObjectFilter::new(self.filter.as_deref())
    }
}

/// Resolved output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Single YAML file holding a map of every object
    Combined(PathBuf),
    /// Directory receiving `<name>.yaml` per object
    Split(PathBuf),
}

impl OutputTarget {
    /// The file or directory path.
    pub fn path(&self) -> &Path {
        match self {
            Self::Combined(path) | Self::Split(path) => path,
        }
    }
}

/// Runs the global describe and describes every object the filter includes.
///
/// A progress line is written to `progress` for every listed object,
/// included or not, before its describe call.
///
/// A name the listing repeats is described only once; later occurrences
/// are skipped with a warning.
///
/// # Errors
/// Returns the first describe error, or an I/O error if writing a progress
/// line fails.
pub async fn collect_descriptions<S, W>(
    source: &S,
    filter: &ObjectFilter,
    messages: &Messages,
    progress: &mut W,
) -> Result<DescriptionCollection>
where
    S: SchemaSource + ?Sized,
    W: Write + ?Sized,
{
    let summaries = source.describe_global().await?;
    info!(
        org = %source.org_label(),
        objects = summaries.len(),
        filter = filter.needle().unwrap_or(""),
        "Global describe completed"
    );

    let mut collection = DescriptionCollection::new();
    for summary in &summaries {
        writeln!(progress, "{}", messages.progress_line(&summary.label, &summary.name))
            .map_err(|e| ObjExportError::io("Failed to write progress line", e))?;

        if !filter.matches(summary) {
            continue;
        }

        if collection.contains(&summary.name) {
            warn!(object = %summary.name, "Object listed more than once; skipping repeat");
            continue;
        }

        debug!(object = %summary.name, "Describing object");
        let description = source.describe_object(&summary.name).await?;
        collection.insert(summary.name.clone(), description)?;
    }

    progress
        .flush()
        .map_err(|e| ObjExportError::io("Failed to flush progress output", e))?;

    info!(
        described = collection.len(),
        listed = summaries.len(),
        "Describe phase completed"
    );
    Ok(collection)
}

/// Runs a complete export and returns the collected descriptions.
///
/// `config.force` is logged but does not change behavior: existing output
/// is always overwritten.
///
/// # Errors
/// Returns the first describe, serialization, or filesystem error. Split
/// mode files written before a write failure are left in place.
pub async fn run<S, W>(
    config: &ExportConfig,
    source: &S,
    messages: &Messages,
    progress: &mut W,
) -> Result<DescriptionCollection>
where
    S: SchemaSource + ?Sized,
    W: Write + ?Sized,
{
    let target = config.output_target();
    let filter = config.object_filter();
    debug!(
        org = config.target_org.as_deref().unwrap_or("<default>"),
        output = %target.path().display(),
        split = config.split,
        force = config.force,
        filter_active = filter.is_active(),
        "Starting export"
    );
    if config.force {
        debug!("--force has no effect; existing output is always overwritten");
    }

    let collection = collect_descriptions(source, &filter, messages, progress).await?;

    match &target {
        OutputTarget::Combined(path) => output::write_combined(&collection, path).await?,
        OutputTarget::Split(dir) => {
            output::write_split(&collection, dir).await?;
        }
    }

    info!("{}", messages.export_complete(collection.len(), target.path()));
    Ok(collection)
}
