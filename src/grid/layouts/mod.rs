use std::fmt::{Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::grid::GridSpec;
use crate::grid::report::MarkerWarning;

pub(crate) mod marked;
pub(crate) mod flat;

use marked::MarkedRecordsDecoder;
use flat::{HeaderPrefixedDecoder, OffsetSkipDecoder, RawConcatenatedDecoder};

/// Width of a Fortran record length marker.
pub const MARKER_WIDTH: usize = 4;
/// Width of one grid value.
pub const ELEMENT_WIDTH: usize = 4;

/// The byte layout a decode actually used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordLayout {
    /// `[i32 marker][f32 x nx*ny][i32 marker]` per field, a fixed gap between fields.
    MarkedRecords,
    /// One opaque value followed by the concatenated fields.
    HeaderPrefixed,
    /// Concatenated fields, nothing else.
    RawConcatenated,
    /// The given number of bytes skipped, then the concatenated fields.
    OffsetSkip(usize),
}

impl Display for RecordLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordLayout::MarkedRecords => write!(f, "MarkedRecords"),
            RecordLayout::HeaderPrefixed => write!(f, "HeaderPrefixed"),
            RecordLayout::RawConcatenated => write!(f, "RawConcatenated"),
            RecordLayout::OffsetSkip(n) => write!(f, "OffsetSkip({})", n),
        }
    }
}

/// Accepts `marked`, `header`, `raw`, `offset` (4 bytes) and `offset:N`.
impl FromStr for RecordLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split(':').collect::<Vec<&str>>()[..] {
            ["marked"] => Ok(RecordLayout::MarkedRecords),
            ["header"] => Ok(RecordLayout::HeaderPrefixed),
            ["raw"] => Ok(RecordLayout::RawConcatenated),
            ["offset"] => Ok(RecordLayout::OffsetSkip(4)),
            ["offset", n] => n
                .parse::<usize>()
                .map(RecordLayout::OffsetSkip)
                .map_err(|e| format!("Wrong offset `{}` : {}", n, e)),
            _ => Err(format!("Unknown layout `{}`", s)),
        }
    }
}

/// Byte length a layout accepts for a given spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLength {
    pub layout: RecordLayout,
    pub bytes: usize,
    /// Trailing bytes are tolerated, so `bytes` is only a lower bound.
    pub minimum: bool,
}

impl Display for LayoutLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.minimum {
            write!(f, "{} >= {}", self.layout, self.bytes)
        } else {
            write!(f, "{} = {}", self.layout, self.bytes)
        }
    }
}

/// Why a single layout did not apply. Never surfaced directly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttemptError {
    #[error("TruncatedInput(needed {needed} bytes at offset {offset}, {available} available)")]
    TruncatedInput { offset: usize, needed: usize, available: usize },

    #[error("LengthMismatch(expected {expected} bytes, found {found})")]
    LengthMismatch { expected: usize, found: usize },

    #[error("MarkerMismatch({0})")]
    MarkerMismatch(MarkerWarning),
}

/// Flat field payloads isolated by a layout, before reshaping.
#[derive(Debug)]
pub(crate) struct Decoded {
    pub(crate) blocks: Vec<Vec<f32>>,
    pub(crate) consumed: usize,
    pub(crate) header_value: Option<f32>,
    pub(crate) warnings: Vec<MarkerWarning>,
}

pub(crate) trait LayoutDecoder {
    fn layout(&self, spec: &GridSpec) -> RecordLayout;

    /// `None` when the length does not fit in `usize`.
    fn accepted_length(&self, spec: &GridSpec) -> Option<LayoutLength>;

    fn decode(&self, spec: &GridSpec, bytes: &[u8]) -> Result<Decoded, AttemptError>;
}

/// Tried in this order, first success wins.
pub(crate) const STRATEGIES: [&dyn LayoutDecoder; 4] = [
    &MarkedRecordsDecoder,
    &HeaderPrefixedDecoder,
    &RawConcatenatedDecoder,
    &OffsetSkipDecoder,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_layout_names() {
        assert_eq!("marked".parse(), Ok(RecordLayout::MarkedRecords));
        assert_eq!("header".parse(), Ok(RecordLayout::HeaderPrefixed));
        assert_eq!("raw".parse(), Ok(RecordLayout::RawConcatenated));
        assert_eq!("offset".parse(), Ok(RecordLayout::OffsetSkip(4)));
        assert_eq!("offset:12".parse(), Ok(RecordLayout::OffsetSkip(12)));
        assert!("offset:x".parse::<RecordLayout>().is_err());
        assert!("grib".parse::<RecordLayout>().is_err());
    }

    #[test]
    fn display_layout_length() {
        let marked = LayoutLength { layout: RecordLayout::MarkedRecords, bytes: 2584, minimum: true };
        let offset = LayoutLength { layout: RecordLayout::OffsetSkip(4), bytes: 2564, minimum: false };

        assert_eq!(marked.to_string(), "MarkedRecords >= 2584");
        assert_eq!(offset.to_string(), "OffsetSkip(4) = 2564");
    }
}
