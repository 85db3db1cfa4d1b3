use crate::axis::AxisError;
use crate::grid;
use crate::stamp::StampError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("DecodeError: {0}")]
    DecodeError(#[from] grid::DecodeError),

    #[error("AxisError: {0}")]
    AxisError(#[from] AxisError),

    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    #[error("StampError: {0}")]
    StampError(#[from] StampError),

    #[error("JsonError: {0}")]
    JsonError(#[from] serde_json::Error),
}
