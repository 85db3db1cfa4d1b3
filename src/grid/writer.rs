use std::io::Write;
use crate::grid::field::{Field, GridStack};
use crate::grid::layouts::RecordLayout;
use crate::grid::utils::{ByteOrder, Endian};
use crate::grid::GridSpec;

/// Encodes fields in any layout the decoder understands. Gaps and offsets are
/// zero filled, the `HeaderPrefixed` value defaults to the number of fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordWriter {
    byte_order: ByteOrder,
    record_gap: usize,
    header_value: Option<f32>,
}

impl RecordWriter {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            record_gap: 8,
            header_value: None,
        }
    }

    /// Writer producing what `spec` expects.
    pub fn for_spec(spec: &GridSpec) -> Self {
        Self::new(spec.byte_order).with_record_gap(spec.record_gap)
    }

    pub fn with_record_gap(self, record_gap: usize) -> Self {
        Self { record_gap, ..self }
    }

    pub fn with_header_value(self, header_value: f32) -> Self {
        Self { header_value: Some(header_value), ..self }
    }

    pub fn encode(&self, stack: &GridStack, layout: RecordLayout) -> Vec<u8> {
        let blocks: Vec<Vec<f32>> = stack.iter().map(Field::values).collect();
        self.encode_blocks(&blocks, layout)
    }

    /// Each block is one flat, row-major field.
    pub fn encode_blocks(&self, blocks: &[Vec<f32>], layout: RecordLayout) -> Vec<u8> {
        let mut out = Vec::new();

        match layout {
            RecordLayout::MarkedRecords => {
                for (i, block) in blocks.iter().enumerate() {
                    // Records over 2 GiB cannot be described by a single marker
                    let marker = i32::try_from(block.len() * 4).unwrap_or(i32::MAX);
                    marker.write_bytes(&mut out, self.byte_order);
                    self.write_values(&mut out, block);
                    marker.write_bytes(&mut out, self.byte_order);

                    if i + 1 < blocks.len() {
                        out.resize(out.len() + self.record_gap, 0);
                    }
                }
            }
            RecordLayout::HeaderPrefixed => {
                let header_value = self.header_value.unwrap_or(blocks.len() as f32);
                header_value.write_bytes(&mut out, self.byte_order);
                blocks.iter().for_each(|block| self.write_values(&mut out, block));
            }
            RecordLayout::RawConcatenated => {
                blocks.iter().for_each(|block| self.write_values(&mut out, block));
            }
            RecordLayout::OffsetSkip(offset) => {
                out.resize(offset, 0);
                blocks.iter().for_each(|block| self.write_values(&mut out, block));
            }
        }

        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W, stack: &GridStack, layout: RecordLayout) -> std::io::Result<()> {
        writer.write_all(&self.encode(stack, layout))?;
        writer.flush()
    }

    fn write_values(&self, out: &mut Vec<u8>, values: &[f32]) {
        out.reserve(values.len() * 4);
        for value in values {
            value.write_bytes(out, self.byte_order);
        }
    }
}

/// Field `k` holds `1000 * k + i` at flat position `i`.
pub fn ramp_stack(nx: usize, ny: usize, field_count: usize) -> GridStack {
    GridStack::from_fields((0..field_count)
        .map(|k| Field::from_flat(k, nx, (0..nx * ny).map(|i| (1000 * k + i) as f32).collect()))
        .collect())
}
