//! Property-based tests for the grid decoder.
//!
//! Grids are small (up to 7x7, 3 fields) with arbitrary f32 bit patterns,
//! NaN payloads included, so equality is checked on bits.

use proptest::prelude::*;
use seqgrid::grid::writer::RecordWriter;
use seqgrid::{accepted_lengths, decode, ByteOrder, ByteSource, DecodeError, GridSpec, GridStack, RecordLayout};

#[derive(Debug, Clone)]
struct Grid {
    nx: usize,
    ny: usize,
    field_count: usize,
    byte_order: ByteOrder,
    values: Vec<f32>,
}

impl Grid {
    fn spec(&self) -> GridSpec {
        GridSpec::new(self.nx, self.ny, self.field_count).with_byte_order(self.byte_order)
    }

    fn blocks(&self) -> Vec<Vec<f32>> {
        self.values.chunks(self.nx * self.ny).map(|block| block.to_vec()).collect()
    }

    fn encode(&self, layout: RecordLayout) -> Vec<u8> {
        RecordWriter::for_spec(&self.spec()).encode_blocks(&self.blocks(), layout)
    }
}

fn bits(stack: &GridStack) -> Vec<u32> {
    stack.iter().flat_map(|field| field.values()).map(f32::to_bits).collect()
}

fn arb_byte_order() -> impl Strategy<Value = ByteOrder> {
    prop_oneof![
        Just(ByteOrder::LittleEndian),
        Just(ByteOrder::BigEndian),
    ]
}

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..8, 1usize..8, 1usize..4, arb_byte_order())
        .prop_flat_map(|(nx, ny, field_count, byte_order)| {
            prop::collection::vec(any::<f32>(), nx * ny * field_count)
                .prop_map(move |values| Grid { nx, ny, field_count, byte_order, values })
        })
}

proptest! {
    #[test]
    fn marked_records_round_trip(grid in arb_grid()) {
        let bytes = grid.encode(RecordLayout::MarkedRecords);
        let (stack, report) = decode(&ByteSource::from(bytes), &grid.spec()).unwrap();

        prop_assert_eq!(report.layout, RecordLayout::MarkedRecords);
        prop_assert!(report.is_clean());
        prop_assert_eq!(stack.len(), grid.field_count);
        prop_assert_eq!(bits(&stack), grid.values.iter().map(|v| v.to_bits()).collect::<Vec<u32>>());
    }

    #[test]
    fn flat_layouts_round_trip(grid in arb_grid(), layout in prop_oneof![
        Just(RecordLayout::HeaderPrefixed),
        Just(RecordLayout::RawConcatenated),
    ]) {
        let bytes = grid.encode(layout);
        let (stack, report) = decode(&ByteSource::from(bytes), &grid.spec()).unwrap();

        prop_assert_eq!(report.layout, layout);
        prop_assert_eq!(report.bytes_leftover, 0);
        prop_assert_eq!(bits(&stack), grid.values.iter().map(|v| v.to_bits()).collect::<Vec<u32>>());
    }

    /// An offset prefix chosen so the same bytes are also a valid
    /// `OffsetSkip` file: the marked reading still wins.
    #[test]
    fn marked_records_take_precedence(grid in arb_grid(), padding in 0usize..16) {
        let mut bytes = grid.encode(RecordLayout::MarkedRecords);
        bytes.resize(bytes.len() + padding, 0);

        let raw = grid.nx * grid.ny * grid.field_count * 4;
        let spec = grid.spec().with_offset_skip(bytes.len() - raw);
        prop_assert!(accepted_lengths(&spec).unwrap().iter()
            .any(|length| length.layout == RecordLayout::OffsetSkip(bytes.len() - raw) && length.bytes == bytes.len()));

        let (stack, report) = decode(&ByteSource::from(bytes), &spec).unwrap();
        prop_assert_eq!(report.layout, RecordLayout::MarkedRecords);
        prop_assert_eq!(report.bytes_leftover, padding);
        prop_assert_eq!(bits(&stack), grid.values.iter().map(|v| v.to_bits()).collect::<Vec<u32>>());
    }

    #[test]
    fn flip_is_a_row_reversal(grid in arb_grid()) {
        let source = ByteSource::from(grid.encode(RecordLayout::MarkedRecords));

        let (plain, _) = decode(&source, &grid.spec()).unwrap();
        let (flipped, report) = decode(&source, &grid.spec().with_flip_rows(true)).unwrap();
        prop_assert!(report.flipped);

        let unflipped: Vec<u32> = flipped.iter()
            .flat_map(|field| field.flipped().values())
            .map(f32::to_bits)
            .collect();
        prop_assert_eq!(unflipped, bits(&plain));
    }

    #[test]
    fn decode_is_deterministic(grid in arb_grid(), layout in prop_oneof![
        Just(RecordLayout::MarkedRecords),
        Just(RecordLayout::HeaderPrefixed),
        Just(RecordLayout::RawConcatenated),
    ]) {
        let source = ByteSource::from(grid.encode(layout));

        let (a, report_a) = decode(&source, &grid.spec()).unwrap();
        let (b, report_b) = decode(&source, &grid.spec()).unwrap();

        prop_assert_eq!(bits(&a), bits(&b));
        prop_assert_eq!(format!("{:?}", report_a), format!("{:?}", report_b));
        prop_assert_eq!(report_a.header_value.map(f32::to_bits), report_b.header_value.map(f32::to_bits));
    }

    /// Any length below the marked minimum that no flat layout accepts fails.
    #[test]
    fn unlisted_lengths_are_rejected(nx in 1usize..8, ny in 1usize..8, field_count in 1usize..4, len in 1usize..512) {
        let spec = GridSpec::new(nx, ny, field_count);
        let lengths = accepted_lengths(&spec).unwrap();
        prop_assume!(lengths.iter().all(|length| length.bytes != len && !(length.minimum && len >= length.bytes)));

        let result = decode(&ByteSource::from(vec![0; len]), &spec);
        prop_assert!(
            matches!(result, Err(DecodeError::UnrecognizedLayout { observed_byte_length, .. }) if observed_byte_length == len),
            "unexpected result {:?}", result
        );
    }
}
