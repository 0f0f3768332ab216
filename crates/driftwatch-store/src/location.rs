//! Data location references
//!
//! A data location is a `bucket/prefix` string pointing at the object store
//! area a table's files land in. The runner's no-data guardrail checks the
//! location before diffing so an unloaded table does not produce a wall of
//! REMOVE_COLUMN noise.

use crate::store::StoreError;
use std::fmt;
use std::str::FromStr;

/// A parsed `bucket/prefix` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DataLocation {
    pub bucket: String,

    /// Key prefix, normalized to end with `/` when non-empty
    pub prefix: String,
}

impl DataLocation {
    /// Parse a `bucket/prefix` string.
    ///
    /// The prefix is optional (`bucket` alone addresses the bucket root) and
    /// gets a trailing `/` appended when missing, so listings stay anchored
    /// at a directory boundary instead of matching sibling prefixes.
    pub fn parse(location: &str) -> Result<Self, StoreError> {
        let trimmed = location.trim();
        if trimmed.is_empty() || trimmed.starts_with('/') {
            return Err(StoreError::InvalidLocation(location.to_string()));
        }

        let (bucket, rest) = match trimmed.split_once('/') {
            Some((bucket, rest)) => (bucket, rest.trim_start_matches('/')),
            None => (trimmed, ""),
        };
        if bucket.is_empty() {
            return Err(StoreError::InvalidLocation(location.to_string()));
        }

        let mut prefix = rest.to_string();
        if !prefix.is_empty() && !prefix.ends_with('/') {
            prefix.push('/');
        }

        Ok(Self {
            bucket: bucket.to_string(),
            prefix,
        })
    }
}

impl FromStr for DataLocation {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_bucket_and_prefix() {
        let location = DataLocation::parse("lake/analytics/orders").unwrap();
        assert_eq!(location.bucket, "lake");
        assert_eq!(location.prefix, "analytics/orders/");
    }

    #[test]
    fn test_parse_preserves_existing_trailing_slash() {
        let location = DataLocation::parse("lake/analytics/orders/").unwrap();
        assert_eq!(location.prefix, "analytics/orders/");
    }

    #[test]
    fn test_parse_bucket_only() {
        let location = DataLocation::parse("lake").unwrap();
        assert_eq!(location.bucket, "lake");
        assert_eq!(location.prefix, "");
    }

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let location = DataLocation::parse("  lake/data  ").unwrap();
        assert_eq!(location.bucket, "lake");
        assert_eq!(location.prefix, "data/");
    }

    #[test]
    fn test_invalid_locations_are_rejected() {
        assert!(DataLocation::parse("").is_err());
        assert!(DataLocation::parse("   ").is_err());
        assert!(DataLocation::parse("/leading/slash").is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let location: DataLocation = "lake/raw".parse().unwrap();
        assert_eq!(location.to_string(), "lake/raw/");
    }
}
