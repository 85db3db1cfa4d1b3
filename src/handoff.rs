//! The document handed to the rendering side: decoded rows plus everything
//! needed to place and title them. Nothing here draws.

use std::io::Write;
use serde::Serialize;
use crate::axis::GridAxes;
use crate::config::TimesConfig;
use crate::error::Result;
use crate::grid::{DecodeReport, Field, GridSpec, GridStack};
use crate::stamp::Stamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandOff {
    pub axes: GridAxes,
    pub fields: Vec<FieldHandOff>,
    pub report: DecodeReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldHandOff {
    pub time_index: usize,
    pub stamp: Stamp,
    pub label: String,
    pub file_name: String,
    pub min: Option<f32>,
    pub max: Option<f32>,
    pub rows: Vec<Vec<f32>>,
}

impl FieldHandOff {
    fn new(field: &Field, times: &TimesConfig) -> Result<Self> {
        let stamp = Stamp::for_field(&times.ref_time, times.step_hours, field.time_index)?;
        let (min, max) = field.min_max().unzip();

        Ok(Self {
            time_index: field.time_index,
            label: stamp.label(),
            file_name: stamp.file_name(),
            stamp,
            min,
            max,
            rows: field.rows().to_vec(),
        })
    }
}

impl HandOff {
    /// Fails when the axes do not describe a `spec` sized grid, or a field
    /// time falls outside the calendar.
    pub fn build(spec: &GridSpec, stack: &GridStack, report: &DecodeReport, axes: &GridAxes, times: &TimesConfig) -> Result<Self> {
        axes.check(spec)?;

        Ok(Self {
            axes: *axes,
            fields: stack.iter().map(|field| FieldHandOff::new(field, times)).collect::<Result<_>>()?,
            report: report.clone(),
        })
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
