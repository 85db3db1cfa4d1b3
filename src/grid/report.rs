use std::fmt::{Display, Formatter};
use serde::Serialize;
use crate::grid::layouts::RecordLayout;
use crate::grid::utils::ByteOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerPosition {
    Leading,
    Trailing,
}

/// A record marker whose value is not the payload length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerWarning {
    pub field: usize,
    pub position: MarkerPosition,
    pub found: i32,
    pub expected: usize,
}

impl Display for MarkerWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "field {} {:?} marker is {}, expected {}", self.field, self.position, self.found, self.expected)
    }
}

/// How a byte source was decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodeReport {
    pub layout: RecordLayout,
    pub byte_order: ByteOrder,
    pub bytes_consumed: usize,
    /// Bytes after the last field. Only `MarkedRecords` tolerates any.
    pub bytes_leftover: usize,
    pub flipped: bool,
    /// Value dropped by `HeaderPrefixed`
    pub header_value: Option<f32>,
    pub marker_warnings: Vec<MarkerWarning>,
}

impl DecodeReport {
    /// No leftover bytes and no marker warnings.
    pub fn is_clean(&self) -> bool {
        self.bytes_leftover == 0 && self.marker_warnings.is_empty()
    }

    pub fn log(&self) {
        info!("Decoded as {} ({:?}) : {} bytes consumed, rows flipped: {}", self.layout, self.byte_order, self.bytes_consumed, self.flipped);

        if let Some(header_value) = self.header_value {
            debug!("Discarded header value {}", header_value);
        }
        for warning in &self.marker_warnings {
            warn!("Record marker mismatch : {}", warning);
        }
        if self.bytes_leftover > 0 {
            warn!("{} bytes left over after the last field", self.bytes_leftover);
        }
    }
}
