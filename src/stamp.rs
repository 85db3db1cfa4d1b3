use std::fmt::{Display, Formatter};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

pub type RefTime = DateTime<Utc>;

pub type ForecastTime = DateTime<Utc>;

impl Durations for i64 {
    fn hours(&self) -> Option<Duration> {
        chrono::Duration::try_hours(*self)
    }
}

/// `None` when the span does not fit a [`Duration`].
pub trait Durations {
    fn hours(&self) -> Option<chrono::Duration>;
}

/// Validity time of one field of a stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamp {
    pub ref_time: RefTime,
    pub forecast_time: ForecastTime,
}

impl Stamp {
    /// Field `time_index` is valid `step_hours * time_index` after `ref_time`.
    pub fn for_field(ref_time: &RefTime, step_hours: i64, time_index: usize) -> Result<Self, StampError> {
        let hours = i64::try_from(time_index).ok()
            .and_then(|index| step_hours.checked_mul(index))
            .ok_or(StampError::OutOfRange { ref_time: *ref_time, hours: None })?;

        (ref_time, hours).try_into()
    }

    pub fn forecast_hour(&self) -> i64 {
        (self.forecast_time - self.ref_time).num_hours()
    }

    pub fn is_analysis(&self) -> bool {
        self.forecast_time == self.ref_time
    }

    pub fn label(&self) -> String {
        if self.is_analysis() {
            format!("analysis {}", self.ref_time.format("%Y-%m-%d %HZ"))
        } else {
            format!("+{:03}h forecast {}", self.forecast_hour(), self.forecast_time.format("%Y-%m-%d %HZ"))
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.f{:03}", self.ref_time.format("%Y%m%d%H"), self.forecast_hour())
    }
}

impl Display for Stamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Z+{:03}", self.ref_time.format("%H"), self.forecast_hour())
    }
}

impl TryFrom<(&RefTime, i64)> for Stamp {
    type Error = StampError;

    fn try_from((ref_time, h): (&RefTime, i64)) -> Result<Self, Self::Error> {
        let forecast_time = h.hours()
            .and_then(|duration| ref_time.checked_add_signed(duration))
            .ok_or(StampError::OutOfRange { ref_time: *ref_time, hours: Some(h) })?;

        Ok(Self {
            ref_time: *ref_time,
            forecast_time,
        })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StampError {
    #[error("OutOfRange({} + {} hours)", .ref_time, format_hours(.hours))]
    OutOfRange { ref_time: RefTime, hours: Option<i64> },
}

fn format_hours(hours: &Option<i64>) -> String {
    hours.map_or_else(|| String::from("too many"), |h| h.to_string())
}
