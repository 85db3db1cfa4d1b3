use crate::grid::GridSpec;
use crate::grid::layouts::{AttemptError, Decoded, LayoutDecoder, LayoutLength, RecordLayout, ELEMENT_WIDTH};
use crate::grid::utils::Buffer;

/// Byte length of `field_count` concatenated fields without markers.
fn payload_bytes(spec: &GridSpec) -> Option<usize> {
    spec.field_bytes_checked()?.checked_mul(spec.field_count)
}

fn exact(layout: RecordLayout, bytes: Option<usize>) -> Option<LayoutLength> {
    bytes.map(|bytes| LayoutLength { layout, bytes, minimum: false })
}

/// Reads `field_count` blocks after `skip` bytes and an optional header value.
/// The input must be exactly `expected` bytes long.
fn read_blocks(spec: &GridSpec, bytes: &[u8], expected: Option<LayoutLength>, skip: usize, header: bool) -> Result<Decoded, AttemptError> {
    let expected = expected.map(|length| length.bytes).unwrap_or(usize::MAX);
    if bytes.len() != expected {
        return Err(AttemptError::LengthMismatch { expected, found: bytes.len() });
    }

    let mut buf = Buffer::new(bytes, spec.byte_order);
    buf.skip(skip)?;

    let header_value = if header { Some(buf.read::<f32>()?) } else { None };

    let mut blocks = Vec::with_capacity(spec.field_count);
    for _ in 0..spec.field_count {
        blocks.push(buf.read_n::<f32>(spec.points())?);
    }

    Ok(Decoded {
        blocks,
        consumed: buf.position(),
        header_value,
        warnings: Vec::new(),
    })
}

/// A single leading value (a count or record marker) before the fields.
pub(crate) struct HeaderPrefixedDecoder;

impl LayoutDecoder for HeaderPrefixedDecoder {
    fn layout(&self, _spec: &GridSpec) -> RecordLayout {
        RecordLayout::HeaderPrefixed
    }

    fn accepted_length(&self, spec: &GridSpec) -> Option<LayoutLength> {
        exact(self.layout(spec), payload_bytes(spec).and_then(|bytes| bytes.checked_add(ELEMENT_WIDTH)))
    }

    fn decode(&self, spec: &GridSpec, bytes: &[u8]) -> Result<Decoded, AttemptError> {
        read_blocks(spec, bytes, self.accepted_length(spec), 0, true)
    }
}

pub(crate) struct RawConcatenatedDecoder;

impl LayoutDecoder for RawConcatenatedDecoder {
    fn layout(&self, _spec: &GridSpec) -> RecordLayout {
        RecordLayout::RawConcatenated
    }

    fn accepted_length(&self, spec: &GridSpec) -> Option<LayoutLength> {
        exact(self.layout(spec), payload_bytes(spec))
    }

    fn decode(&self, spec: &GridSpec, bytes: &[u8]) -> Result<Decoded, AttemptError> {
        read_blocks(spec, bytes, self.accepted_length(spec), 0, false)
    }
}

/// Last resort: an unknown prefix of `offset_skip` bytes.
pub(crate) struct OffsetSkipDecoder;

impl LayoutDecoder for OffsetSkipDecoder {
    fn layout(&self, spec: &GridSpec) -> RecordLayout {
        RecordLayout::OffsetSkip(spec.offset_skip)
    }

    fn accepted_length(&self, spec: &GridSpec) -> Option<LayoutLength> {
        exact(self.layout(spec), payload_bytes(spec).and_then(|bytes| bytes.checked_add(spec.offset_skip)))
    }

    fn decode(&self, spec: &GridSpec, bytes: &[u8]) -> Result<Decoded, AttemptError> {
        read_blocks(spec, bytes, self.accepted_length(spec), spec.offset_skip, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ByteOrder;

    fn floats(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    fn spec() -> GridSpec {
        GridSpec::new(2, 2, 2).with_byte_order(ByteOrder::BigEndian)
    }

    #[test]
    fn raw_requires_exact_length() {
        let bytes = floats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let decoded = RawConcatenatedDecoder.decode(&spec(), &bytes).unwrap();
        assert_eq!(decoded.blocks, vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]]);
        assert_eq!(decoded.consumed, 32);
        assert_eq!(decoded.header_value, None);

        assert_eq!(
            RawConcatenatedDecoder.decode(&spec(), &bytes[..31]).unwrap_err(),
            AttemptError::LengthMismatch { expected: 32, found: 31 }
        );
    }

    #[test]
    fn header_value_is_discarded() {
        let bytes = floats(&[320.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);

        let decoded = HeaderPrefixedDecoder.decode(&spec(), &bytes).unwrap();
        assert_eq!(decoded.header_value, Some(320.0));
        assert_eq!(decoded.blocks[0], vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(decoded.blocks[1], vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(decoded.consumed, 36);
    }

    #[test]
    fn offset_skip_uses_configured_offset() {
        let mut bytes = vec![0xFF; 12];
        bytes.extend(floats(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]));

        let spec = spec().with_offset_skip(12);
        assert_eq!(OffsetSkipDecoder.layout(&spec), RecordLayout::OffsetSkip(12));

        let decoded = OffsetSkipDecoder.decode(&spec, &bytes).unwrap();
        assert_eq!(decoded.blocks[1], vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(decoded.header_value, None);
    }
}
