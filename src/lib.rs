#[macro_use]
extern crate log;

pub mod axis;
pub mod config;
pub mod error;
pub mod grid;
pub mod handoff;
pub mod stamp;

pub use grid::{accepted_lengths, decode, ByteOrder, ByteSource, DecodeError, DecodeReport, Field, GridSpec, GridStack, RecordLayout};
