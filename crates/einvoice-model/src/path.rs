//! `|`-delimited ancestor chains.
//!
//! The same path string is read two different ways: settings pruning drops
//! the leaf's second-to-last ancestor, error labelling drops the last two
//! segments. The two rules stay separate.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const PATH_DELIMITER: char = '|';

/// Ancestor chain of a field, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut raw = String::new();
        for segment in segments {
            if !raw.is_empty() {
                raw.push(PATH_DELIMITER);
            }
            raw.push_str(segment.as_ref());
        }
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> Vec<&str> {
        if self.0.is_empty() {
            return Vec::new();
        }
        self.0.split(PATH_DELIMITER).collect()
    }

    /// Dotted path into the settings object for pruning a deactivated field.
    ///
    /// Counting ancestors only (the leaf excluded), the second-to-last one
    /// is a wrapper node with no counterpart in the settings object; the
    /// leaf keeps its own name. `A|B|C|D` becomes `A.C.D`. Paths with fewer
    /// than three segments are joined unchanged.
    pub fn settings_deletion_path(&self) -> String {
        let mut segments = self.segments();
        if segments.len() >= 3 {
            segments.remove(segments.len() - 3);
        }
        segments.join(".")
    }

    /// Ancestors used to label an error: everything except the last two
    /// segments.
    pub fn display_ancestors(&self) -> Vec<&str> {
        let segments = self.segments();
        let keep = segments.len().saturating_sub(2);
        segments[..keep].to_vec()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
