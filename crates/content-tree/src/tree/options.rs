//! Settings that shape how a content tree is built

use crate::tree::Priority;
use anyhow::{ensure, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker appended to files that are still being downloaded
pub const DEFAULT_INCOMPLETE_SUFFIX: &str = ".!qB";

/// Options applied when nodes are created
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TreeOptions {
    /// Suffix removed from display names (once) when a node is created
    pub incomplete_suffix: String,
    /// Priority given to newly created files
    pub default_priority: Priority,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            incomplete_suffix: DEFAULT_INCOMPLETE_SUFFIX.to_string(),
            default_priority: Priority::NORMAL,
        }
    }
}

impl TreeOptions {
    /// Check that the options can be applied to files
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.default_priority.is_partial(),
            "default priority cannot be {}",
            self.default_priority
        );
        Ok(())
    }

    /// Strip the incomplete suffix from `name`, at most once
    ///
    /// A name that is nothing but the suffix is kept as is.
    pub fn display_name<'a>(&self, name: &'a str) -> &'a str {
        if self.incomplete_suffix.is_empty() {
            return name;
        }
        match name.strip_suffix(self.incomplete_suffix.as_str()) {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => name,
        }
    }
}
