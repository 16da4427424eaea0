//! Case-insensitive name/label filter for the global describe listing.

use crate::models::ObjectSummary;

/// Substring filter applied to each [`ObjectSummary`].
///
/// An inactive filter includes every object. An active filter includes an
/// object when its lower-cased name or lower-cased label contains the
/// lower-cased needle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectFilter {
    needle: Option<String>,
}

impl ObjectFilter {
    /// Builds a filter from the `--filter` value.
    ///
    /// An absent or empty substring yields an inactive filter.
    pub fn new(substring: Option<&str>) -> Self {
        Self {
            needle: substring
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
        }
    }

    /// Filter that includes everything.
    pub const fn include_all() -> Self {
        Self { needle: None }
    }

    /// True when a substring was supplied.
    pub const fn is_active(&self) -> bool {
        self.needle.is_some()
    }

    /// The normalized (lower-cased) substring, if any.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Decides whether `summary` is included in the export.
    pub fn matches(&self, summary: &ObjectSummary) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => {
                summary.name.to_lowercase().contains(needle.as_str())
                    || summary.label.to_lowercase().contains(needle.as_str())
            }
        }
    }
}
