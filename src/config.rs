use chrono::{DateTime, TimeZone, Utc};
use serde::{Serialize, Deserialize};
use crate::axis::GridAxes;
use crate::grid::{ByteOrder, GridSpec};

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
  pub decoder: DecoderConfig,
  pub axes: GridAxes,
  pub times: TimesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecoderConfig {
  pub nx: usize,
  pub ny: usize,
  pub field_count: usize,
  /// Native order when unset
  pub byte_order: Option<ByteOrder>,
  pub flip_rows: bool,
  pub record_gap: usize,
  pub offset_skip: usize,
  pub strict_markers: bool,
}

impl Default for DecoderConfig {
  fn default() -> Self {
    Self {
      nx: 20,
      ny: 16,
      field_count: 2,
      byte_order: None,
      flip_rows: false,
      record_gap: 8,
      offset_skip: 4,
      strict_markers: false,
    }
  }
}

impl From<&DecoderConfig> for GridSpec {
  fn from(config: &DecoderConfig) -> Self {
    GridSpec::new(config.nx, config.ny, config.field_count)
      .with_byte_order(config.byte_order.unwrap_or_default())
      .with_flip_rows(config.flip_rows)
      .with_record_gap(config.record_gap)
      .with_offset_skip(config.offset_skip)
      .with_strict_markers(config.strict_markers)
  }
}

/// Field `i` is valid `step_hours * i` after `ref_time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimesConfig {
  pub ref_time: DateTime<Utc>,
  pub step_hours: i64,
}

impl Default for TimesConfig {
  fn default() -> Self {
    Self {
      ref_time: Utc.with_ymd_and_hms(1973, 4, 29, 0, 0, 0).single().expect("valid reference time"),
      step_hours: 24,
    }
  }
}
