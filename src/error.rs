use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("series {series_index} has {actual} values but the time axis has {expected}")]
    MisalignedSeries {
        series_index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown time zone: {0}")]
    InvalidTimeZone(String),
}
