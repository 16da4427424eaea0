//! User-facing message table.
//!
//! All strings shown to the user (help text, progress lines, completion
//! notices) come from one explicit table. The table is built once at startup
//! from [`DEFAULT_MESSAGES`] and may be overridden from a YAML file; nothing
//! is discovered at runtime.

use std::collections::BTreeMap;
use std::path::Path;

use crate::Result;
use crate::error::ObjExportError;

/// Key of the command description
pub const COMMAND_DESCRIPTION: &str = "commandDescription";
/// Key of the `--output` help text
pub const OUTPUT_FLAG_DESCRIPTION: &str = "outputFlagDescription";
/// Key of the `--filter` help text
pub const FILTER_FLAG_DESCRIPTION: &str = "filterFlagDescription";
/// Key of the `--force` help text
pub const FORCE_FLAG_DESCRIPTION: &str = "forceFlagDescription";
/// Key of the `--split` help text
pub const SPLIT_FLAG_DESCRIPTION: &str = "splitFlagDescription";
/// Key of the per-object progress template (`{label}`, `{name}`)
pub const PROGRESS_LINE: &str = "progressLine";
/// Key of the completion notice template (`{count}`, `{path}`)
pub const EXPORT_COMPLETE: &str = "exportComplete";

/// Built-in message table.
pub const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (
        COMMAND_DESCRIPTION,
        "Export sobject describe metadata from an org to YAML",
    ),
    (
        OUTPUT_FLAG_DESCRIPTION,
        "Output file, or output directory with --split \
         (default: object-schema.yaml, or object-schema with --split)",
    ),
    (
        FILTER_FLAG_DESCRIPTION,
        "Only export objects whose name or label contains this text (case-insensitive)",
    ),
    (
        FORCE_FLAG_DESCRIPTION,
        "Overwrite existing output (existing output is currently always overwritten)",
    ),
    (
        SPLIT_FLAG_DESCRIPTION,
        "Write one <name>.yaml file per object into the output directory",
    ),
    (PROGRESS_LINE, "{label} - {name}"),
    (EXPORT_COMPLETE, "Exported {count} objects to {path}"),
];

/// Looks up a key in the built-in table.
///
/// Used for clap help text, which has to be known before any override file
/// could be read.
pub fn default_message(key: &str) -> &'static str {
    DEFAULT_MESSAGES
        .iter()
        .find(|(k, _)| *k == key)
        .map_or("", |(_, v)| *v)
}

/// Message table passed explicitly to everything that talks to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    entries: BTreeMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }
}

impl Messages {
    /// Built-in table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in table with overrides read from a YAML mapping of key to string.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it
    /// names a key that is not part of the table.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ObjExportError::io(format!("Failed to read messages file {}", path.display()), e)
        })?;
        Self::new().with_overrides_yaml(&content)
    }

    /// Applies overrides from YAML text.
    ///
    /// # Errors
    /// Returns an error on malformed YAML or an unknown key.
    pub fn with_overrides_yaml(mut self, yaml: &str) -> Result<Self> {
        let overrides: BTreeMap<String, String> = serde_yaml::from_str(yaml)
            .map_err(|e| ObjExportError::serialization("Failed to parse messages file", e))?;
        for (key, value) in overrides {
            self = self.with_override(key, value)?;
        }
        Ok(self)
    }

    /// Replaces a single message.
    ///
    /// # Errors
    /// Returns a configuration error if `key` is not part of the table.
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        match self.entries.get_mut(&key) {
            Some(slot) => {
                *slot = value.into();
                Ok(self)
            }
            None => Err(ObjExportError::configuration(format!(
                "Unknown message key '{key}'"
            ))),
        }
    }

    /// Returns the message stored under `key`.
    ///
    /// # Errors
    /// Returns a configuration error if `key` is not part of the table.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ObjExportError::configuration(format!("Unknown message key '{key}'")))
    }

    /// Renders the per-object progress line, `"<label> - <name>"` by default.
    pub fn progress_line(&self, label: &str, name: &str) -> String {
        render(
            self.template(PROGRESS_LINE),
            &[("label", label), ("name", name)],
        )
    }

    /// Renders the completion notice.
    pub fn export_complete(&self, count: usize, path: &Path) -> String {
        let count = count.to_string();
        let path = path.display().to_string();
        render(
            self.template(EXPORT_COMPLETE),
            &[("count", count.as_str()), ("path", path.as_str())],
        )
    }

    fn template(&self, key: &str) -> &str {
        self.entries
            .get(key)
            .map_or_else(|| default_message(key), String::as_str)
    }
}

/// Substitutes `{key}` placeholders in one left-to-right pass.
///
/// Inserted values are never rescanned. Braces that do not form a known
/// placeholder are kept as written.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (before, from_brace) = rest.split_at(open);
        out.push_str(before);

        let placeholder = from_brace.get(1..).and_then(|inner| {
            let close = inner.find('}')?;
            let key = inner.get(..close)?;
            let value = values.iter().find(|(k, _)| *k == key)?.1;
            Some((value, inner.get(close..)?.get(1..)?))
        });

        match placeholder {
            Some((value, after)) => {
                out.push_str(value);
                rest = after;
            }
            None => {
                out.push('{');
                rest = from_brace.get(1..).unwrap_or_default();
            }
        }
    }

    out.push_str(rest);
    out
}
