//! Decoding of gridded fields written with Fortran sequential unformatted I/O.
//!
//! A Fortran `write` on an unformatted sequential unit wraps each record in
//! two 4 byte length markers. Files seen in practice do not always follow
//! that convention, so [`decode`] tries a fixed list of layouts, in order, and
//! reports which one matched:
//!
//! 1. [`RecordLayout::MarkedRecords`]
//! 2. [`RecordLayout::HeaderPrefixed`]
//! 3. [`RecordLayout::RawConcatenated`]
//! 4. [`RecordLayout::OffsetSkip`]
//!
//! Nothing here logs or touches the filesystem: the caller loads a
//! [`ByteSource`] and decides what to do with the [`DecodeReport`].

mod field;
mod layouts;
mod report;
mod source;
mod utils;
pub mod writer;

pub use field::{Field, GridStack};
pub use layouts::{LayoutLength, RecordLayout, ELEMENT_WIDTH, MARKER_WIDTH};
pub use report::{DecodeReport, MarkerPosition, MarkerWarning};
pub use source::ByteSource;
pub use utils::ByteOrder;

use layouts::{AttemptError, Decoded, STRATEGIES};

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("ValidationError({0})")]
    ValidationError(String),

    #[error("UnrecognizedLayout({} bytes, accepted: {}{})",
        .observed_byte_length,
        format_lengths(.expected_range),
        truncation_note(.truncated))]
    UnrecognizedLayout {
        observed_byte_length: usize,
        /// What each layout would have accepted, in the order they were tried
        expected_range: Vec<LayoutLength>,
        /// `MarkedRecords` started matching and ran out of bytes
        truncated: bool,
    },
}

fn format_lengths(lengths: &[LayoutLength]) -> String {
    lengths.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

fn truncation_note(truncated: &bool) -> &'static str {
    if *truncated {
        ", marked records ran out of bytes"
    } else {
        ""
    }
}

/// Expected geometry and decoding options.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridSpec {
    /// Columns (longitude points)
    pub nx: usize,
    /// Rows (latitude points)
    pub ny: usize,
    pub field_count: usize,
    pub byte_order: ByteOrder,
    /// Reverse the row order of every decoded field
    pub flip_rows: bool,
    /// Bytes between two marked records, after the trailing marker of the first
    pub record_gap: usize,
    /// Prefix length for [`RecordLayout::OffsetSkip`]
    pub offset_skip: usize,
    /// Reject marked records whose markers are not the payload length
    pub strict_markers: bool,
}

impl GridSpec {
    pub fn new(nx: usize, ny: usize, field_count: usize) -> Self {
        Self {
            nx,
            ny,
            field_count,
            byte_order: ByteOrder::native(),
            flip_rows: false,
            record_gap: 8,
            offset_skip: 4,
            strict_markers: false,
        }
    }

    pub fn with_byte_order(self, byte_order: ByteOrder) -> Self {
        Self { byte_order, ..self }
    }

    pub fn with_flip_rows(self, flip_rows: bool) -> Self {
        Self { flip_rows, ..self }
    }

    pub fn with_record_gap(self, record_gap: usize) -> Self {
        Self { record_gap, ..self }
    }

    pub fn with_offset_skip(self, offset_skip: usize) -> Self {
        Self { offset_skip, ..self }
    }

    pub fn with_strict_markers(self, strict_markers: bool) -> Self {
        Self { strict_markers, ..self }
    }

    /// Values per field.
    pub fn points(&self) -> usize {
        self.nx.saturating_mul(self.ny)
    }

    /// Payload bytes per field.
    pub fn field_bytes(&self) -> usize {
        self.points().saturating_mul(ELEMENT_WIDTH)
    }

    pub(crate) fn field_bytes_checked(&self) -> Option<usize> {
        self.nx.checked_mul(self.ny)?.checked_mul(ELEMENT_WIDTH)
    }

    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 || self.field_count == 0 {
            return Err(DecodeError::ValidationError(format!(
                "nx, ny and field count must be at least 1, got {}x{}x{}", self.nx, self.ny, self.field_count
            )));
        }
        if STRATEGIES.iter().any(|strategy| strategy.accepted_length(self).is_none()) {
            return Err(DecodeError::ValidationError(format!(
                "{}x{}x{} grid is too large", self.nx, self.ny, self.field_count
            )));
        }

        Ok(())
    }
}

/// Byte length accepted by each layout, in the order they are tried.
pub fn accepted_lengths(spec: &GridSpec) -> Result<Vec<LayoutLength>> {
    spec.validate()?;

    Ok(STRATEGIES.iter()
        .filter_map(|strategy| strategy.accepted_length(spec))
        .collect())
}

/// Decodes all `spec.field_count` fields or fails; never a partial stack.
pub fn decode(source: &ByteSource, spec: &GridSpec) -> Result<(GridStack, DecodeReport)> {
    spec.validate()?;
    if source.is_empty() {
        return Err(DecodeError::ValidationError(String::from("byte source is empty")));
    }

    let bytes = source.as_bytes();
    let mut truncated = false;

    for strategy in STRATEGIES {
        match strategy.decode(spec, bytes) {
            Ok(decoded) => return Ok(assemble(spec, strategy.layout(spec), bytes.len(), decoded)),
            Err(AttemptError::TruncatedInput { .. }) => truncated = true,
            Err(AttemptError::LengthMismatch { .. }) | Err(AttemptError::MarkerMismatch(_)) => {}
        }
    }

    Err(DecodeError::UnrecognizedLayout {
        observed_byte_length: bytes.len(),
        expected_range: accepted_lengths(spec)?,
        truncated,
    })
}

fn assemble(spec: &GridSpec, layout: RecordLayout, total: usize, decoded: Decoded) -> (GridStack, DecodeReport) {
    let fields = decoded.blocks.into_iter()
        .enumerate()
        .map(|(time_index, values)| {
            let mut field = Field::from_flat(time_index, spec.nx, values);
            if spec.flip_rows {
                field.flip_rows();
            }
            field
        })
        .collect();

    let report = DecodeReport {
        layout,
        byte_order: spec.byte_order,
        bytes_consumed: decoded.consumed,
        bytes_leftover: total - decoded.consumed,
        flipped: spec.flip_rows,
        header_value: decoded.header_value,
        marker_warnings: decoded.warnings,
    };

    (GridStack::from_fields(fields), report)
}
