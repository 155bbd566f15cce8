//! Download priority levels

use anyhow::bail;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Download weight of a file or folder
///
/// Concrete values run from [`IGNORED`](Self::IGNORED) (0, not downloaded) up
/// to [`MAXIMUM`](Self::MAXIMUM) (7). [`PARTIAL`](Self::PARTIAL) only ever
/// appears on folders whose children disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i8", into = "i8"))]
pub struct Priority(i8);

impl Priority {
    pub const PARTIAL: Priority = Priority(-1);
    pub const IGNORED: Priority = Priority(0);
    pub const NORMAL: Priority = Priority(1);
    pub const HIGH: Priority = Priority(2);
    pub const MAXIMUM: Priority = Priority(7);

    /// Build a priority from its raw weight, `None` when out of range
    pub const fn new(weight: i8) -> Option<Self> {
        if weight < Self::PARTIAL.0 || weight > Self::MAXIMUM.0 {
            return None;
        }
        Some(Priority(weight))
    }

    pub const fn value(self) -> i8 {
        self.0
    }

    pub const fn is_ignored(self) -> bool {
        self.0 == Self::IGNORED.0
    }

    pub const fn is_partial(self) -> bool {
        self.0 == Self::PARTIAL.0
    }

    /// True for concrete priorities that request a download
    pub const fn is_wanted(self) -> bool {
        self.0 > Self::IGNORED.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::NORMAL
    }
}

impl TryFrom<i8> for Priority {
    type Error = anyhow::Error;

    fn try_from(weight: i8) -> anyhow::Result<Self> {
        match Priority::new(weight) {
            Some(priority) => Ok(priority),
            None => bail!("priority {weight} is outside -1..=7"),
        }
    }
}

impl From<Priority> for i8 {
    fn from(priority: Priority) -> Self {
        priority.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Priority::PARTIAL => write!(f, "Mixed"),
            Priority::IGNORED => write!(f, "Ignored"),
            Priority::NORMAL => write!(f, "Normal"),
            Priority::HIGH => write!(f, "High"),
            Priority::MAXIMUM => write!(f, "Maximum"),
            Priority(weight) => write!(f, "Priority {weight}"),
        }
    }
}
