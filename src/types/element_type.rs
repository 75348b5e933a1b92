//! This module defines the canonical, type-safe representation of the element
//! types the codecs can operate on.

use crate::error::DeltapackError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The unsigned element width of a packed stream.
///
/// Every codec is defined over one machine word, so the element type also fixes
/// the sub-block length, the chunk length and the varint bound.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementType {
    UInt32,
    UInt64,
}

impl ElementType {
    /// Size of one element (and one packed word) in bytes.
    pub fn byte_width(&self) -> usize {
        match self {
            Self::UInt32 => 4,
            Self::UInt64 => 8,
        }
    }
}

/// Provides the canonical string representation for an `ElementType`.
impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for ElementType {
    type Err = DeltapackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UInt32" | "u32" => Ok(Self::UInt32),
            "UInt64" | "u64" => Ok(Self::UInt64),
            other => Err(DeltapackError::UnsupportedType(other.to_string())),
        }
    }
}
