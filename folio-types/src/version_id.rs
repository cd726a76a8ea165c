//! Version identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Names one of the two content slots a model carries.
///
/// `Latest` is the published copy; `Changes` is the working draft that an
/// editor saves into before publishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionId {
    /// Unpublished edits.
    Changes,
    /// The published content.
    Latest,
}

impl VersionId {
    /// All versions, in enumeration order.
    pub const ALL: [VersionId; 2] = [VersionId::Changes, VersionId::Latest];

    /// Returns the wire name of the version.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Changes => "changes",
            Self::Latest => "latest",
        }
    }

    /// Returns true for the published version.
    #[must_use]
    pub const fn is_latest(&self) -> bool {
        matches!(self, Self::Latest)
    }

    /// Returns true for the draft version.
    #[must_use]
    pub const fn is_changes(&self) -> bool {
        matches!(self, Self::Changes)
    }

    /// Returns the other version of the pair.
    #[must_use]
    pub const fn sibling(&self) -> Self {
        match self {
            Self::Changes => Self::Latest,
            Self::Latest => Self::Changes,
        }
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "changes" => Ok(Self::Changes),
            "latest" => Ok(Self::Latest),
            other => Err(crate::Error::InvalidVersionId(other.to_string())),
        }
    }
}
