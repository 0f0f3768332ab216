//! Column schema model shared by contracts and catalog snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tri-state nullability flag.
///
/// Catalogs that do not report nullability yield `Unknown`; the diff engine
/// only compares nullability when both sides are known. On the wire this is
/// plain `true` / `false` / `null` so contract documents and drift payloads
/// keep the shape other tooling already expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Nullability {
    /// The column accepts nulls
    Yes,
    /// The column rejects nulls
    No,
    /// The source system did not report nullability
    #[default]
    Unknown,
}

impl Nullability {
    /// Returns true when the source system actually reported a value.
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl From<Option<bool>> for Nullability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unknown,
        }
    }
}

impl From<Nullability> for Option<bool> {
    fn from(value: Nullability) -> Self {
        match value {
            Nullability::Yes => Some(true),
            Nullability::No => Some(false),
            Nullability::Unknown => None,
        }
    }
}

impl fmt::Display for Nullability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "true"),
            Self::No => write!(f, "false"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single schema field.
///
/// `data_type` is a free-form descriptor string (`int`, `decimal(10,2)`,
/// `array<string>`, ...) preserved exactly as the source reported it. Only
/// the type classifier interprets descriptors; everything else treats them
/// as opaque text so unknown types flow through without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Matched case-insensitively, displayed verbatim.
    pub name: String,

    /// Type descriptor as reported by the source
    #[serde(rename = "type")]
    pub data_type: String,

    /// Nullability flag, `null` on the wire when unknown
    #[serde(default)]
    pub nullable: Nullability,

    /// Free-text description carried through from the contract
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Contract-defined labels, opaque to the diff engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Column {
    /// Create a column with unknown nullability.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: Nullability::Unknown,
            comment: None,
            tags: None,
        }
    }

    /// Set the nullability flag.
    pub fn with_nullability(mut self, nullable: Nullability) -> Self {
        self.nullable = nullable;
        self
    }

    /// Attach a description.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Attach contract labels.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    /// Case-folded key used to match columns across schemas.
    pub fn match_key(&self) -> String {
        self.name.to_lowercase()
    }

    /// Type descriptor normalized for equality checks (trimmed, lower-cased).
    pub fn normalized_type(&self) -> String {
        self.data_type.trim().to_lowercase()
    }
}
