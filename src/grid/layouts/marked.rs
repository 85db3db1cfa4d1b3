use crate::grid::GridSpec;
use crate::grid::layouts::{AttemptError, Decoded, LayoutDecoder, LayoutLength, RecordLayout, MARKER_WIDTH};
use crate::grid::report::{MarkerPosition, MarkerWarning};
use crate::grid::utils::Buffer;

/// Fortran unformatted sequential records, one per field.
pub(crate) struct MarkedRecordsDecoder;

impl MarkedRecordsDecoder {
    fn check_marker(spec: &GridSpec, field: usize, position: MarkerPosition, found: i32, warnings: &mut Vec<MarkerWarning>) -> Result<(), AttemptError> {
        let expected = spec.field_bytes();
        if usize::try_from(found).ok() == Some(expected) {
            return Ok(());
        }

        let warning = MarkerWarning { field, position, found, expected };
        if spec.strict_markers {
            return Err(AttemptError::MarkerMismatch(warning));
        }
        warnings.push(warning);

        Ok(())
    }
}

impl LayoutDecoder for MarkedRecordsDecoder {
    fn layout(&self, _spec: &GridSpec) -> RecordLayout {
        RecordLayout::MarkedRecords
    }

    fn accepted_length(&self, spec: &GridSpec) -> Option<LayoutLength> {
        let record = spec.field_bytes_checked()?.checked_add(2 * MARKER_WIDTH)?;
        let gaps = spec.field_count.checked_sub(1)?.checked_mul(spec.record_gap)?;

        Some(LayoutLength {
            layout: RecordLayout::MarkedRecords,
            bytes: record.checked_mul(spec.field_count)?.checked_add(gaps)?,
            minimum: true,
        })
    }

    fn decode(&self, spec: &GridSpec, bytes: &[u8]) -> Result<Decoded, AttemptError> {
        let mut buf = Buffer::new(bytes, spec.byte_order);
        let mut blocks = Vec::with_capacity(spec.field_count);
        let mut warnings = Vec::new();

        for field in 0..spec.field_count {
            let leading = buf.read::<i32>()?;
            Self::check_marker(spec, field, MarkerPosition::Leading, leading, &mut warnings)?;

            blocks.push(buf.read_n::<f32>(spec.points())?);

            let trailing = buf.read::<i32>()?;
            Self::check_marker(spec, field, MarkerPosition::Trailing, trailing, &mut warnings)?;

            // Adjacent record boundaries between two fields
            if field + 1 < spec.field_count {
                buf.skip(spec.record_gap)?;
            }
        }

        Ok(Decoded {
            blocks,
            consumed: buf.position(),
            header_value: None,
            warnings,
        })
    }
}
