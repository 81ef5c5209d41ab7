//! Hierarchical classification codes ("smart codes").
//!
//! A smart code identifies the business meaning of a record and drives rule
//! dispatch. Wire format: ASCII, dot-separated, at least three segments, the
//! first segment being the literal product prefix and the last a literal
//! `v<integer>` version marker, e.g. `TESSERA.JEWELRY.POS.SALE.TXN.v1`.
//!
//! Parsing fails closed: a code with fewer than three segments is rejected
//! before any dispatch is attempted. Domain matching is case-sensitive as
//! authored.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The literal product prefix carried as the first segment of every code.
pub const PRODUCT_PREFIX: &str = "TESSERA";

/// Minimum number of dot-separated segments in a well-formed code.
pub const MIN_SEGMENTS: usize = 3;

/// Errors produced while parsing a smart code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmartCodeError {
    /// The code has fewer than [`MIN_SEGMENTS`] dot-separated segments.
    #[error("smart code '{code}' is malformed: expected at least {MIN_SEGMENTS} dot-separated segments")]
    TooFewSegments {
        /// The offending code as supplied.
        code: String,
    },
}

/// A parsed smart code.
///
/// The original string is preserved verbatim; segment accessors expose the
/// decoded structure. The second segment is the business domain used for
/// rule dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SmartCode {
    raw: String,
    segments: Vec<String>,
}

impl SmartCode {
    /// Parses a smart code, failing closed on fewer than three segments.
    ///
    /// # Errors
    ///
    /// Returns [`SmartCodeError::TooFewSegments`] for a code with fewer than
    /// [`MIN_SEGMENTS`] dot-separated segments.
    pub fn parse(code: &str) -> Result<Self, SmartCodeError> {
        let segments: Vec<String> = code.split('.').map(str::to_string).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(SmartCodeError::TooFewSegments {
                code: code.to_string(),
            });
        }

        Ok(Self {
            raw: code.to_string(),
            segments,
        })
    }

    /// Returns the code as originally authored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the product prefix (first segment).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.segments[0]
    }

    /// Returns the business domain (second segment), case-sensitive as authored.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.segments[1]
    }

    /// Returns segment `index`, if present.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Returns all segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the version from the trailing `v<integer>` segment, if well-formed.
    #[must_use]
    pub fn version(&self) -> Option<u32> {
        self.segments
            .last()?
            .strip_prefix('v')?
            .parse::<u32>()
            .ok()
    }
}

impl std::fmt::Display for SmartCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for SmartCode {
    type Err = SmartCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SmartCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for SmartCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
