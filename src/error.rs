use thiserror::Error;

pub type HistogramResult<T> = Result<T, HistogramError>;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("bin width must be finite and > 0, got {width}")]
    InvalidBinWidth { width: f64 },

    #[error("month-denominated bin width is only valid on a date axis")]
    MonthWidthOnLinearAxis,

    #[error("series index {index} out of range ({rendered} series rendered)")]
    SeriesIndexOutOfRange { index: usize, rendered: usize },

    #[error("invalid data: {0}")]
    InvalidData(String),
}
