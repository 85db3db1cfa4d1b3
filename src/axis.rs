use serde::{Deserialize, Serialize};
use crate::grid::GridSpec;

/// Regularly spaced coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub start: f64,
    pub step: f64,
    pub count: usize,
}

impl Axis {
    pub fn new(start: f64, step: f64, count: usize) -> Self {
        Self { start, step, count }
    }

    pub fn value(&self, i: usize) -> f64 {
        self.start + i as f64 * self.step
    }

    pub fn values(&self) -> Vec<f64> {
        (0..self.count).map(|i| self.value(i)).collect()
    }

    /// Last coordinate.
    pub fn end(&self) -> f64 {
        self.value(self.count.saturating_sub(1))
    }
}

/// Longitude runs along a row (`nx`), latitude along a column (`ny`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridAxes {
    pub lon: Axis,
    pub lat: Axis,
}

impl Default for GridAxes {
    fn default() -> Self {
        Self {
            lon: Axis::new(85.0, 3.5, 20),
            lat: Axis::new(32.5, 2.5, 16),
        }
    }
}

impl GridAxes {
    pub fn check(&self, spec: &GridSpec) -> Result<(), AxisError> {
        for (name, axis, expected) in [("lon", &self.lon, spec.nx), ("lat", &self.lat, spec.ny)] {
            if axis.count != expected {
                return Err(AxisError::CountMismatch { axis: name, count: axis.count, expected });
            }
            if !axis.step.is_finite() || axis.step == 0.0 || !axis.start.is_finite() {
                return Err(AxisError::InvalidAxis { axis: name, start: axis.start, step: axis.step });
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AxisError {
    #[error("CountMismatch({axis} axis has {count} points, grid has {expected})")]
    CountMismatch { axis: &'static str, count: usize, expected: usize },

    #[error("InvalidAxis({axis} axis start {start} step {step})")]
    InvalidAxis { axis: &'static str, start: f64, step: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_axes_values() {
        let axes = GridAxes::default();

        assert_eq!(axes.lon.values()[..3], [85.0, 88.5, 92.0]);
        assert_eq!(axes.lon.end(), 151.5);
        assert_eq!(axes.lat.end(), 70.0);
        assert_eq!(axes.lat.values().len(), 16);
    }

    #[test]
    fn check_against_spec() {
        let axes = GridAxes::default();

        assert!(axes.check(&GridSpec::new(20, 16, 2)).is_ok());
        assert_eq!(
            axes.check(&GridSpec::new(16, 20, 2)),
            Err(AxisError::CountMismatch { axis: "lon", count: 20, expected: 16 })
        );

        let flat = GridAxes { lat: Axis::new(32.5, 0.0, 16), ..axes };
        assert!(matches!(flat.check(&GridSpec::new(20, 16, 2)), Err(AxisError::InvalidAxis { axis: "lat", .. })));
    }
}
