use thiserror::Error;

/// Failures raised by the clustering core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClusteringError {
    #[error("point {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot form {k} clusters from {points} points")]
    InvalidClusterCount { k: usize, points: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, ClusteringError>;

/// Failures raised while reading the point table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("record {record}, field {field}: cannot parse {value:?} as a number")]
    Parse {
        record: usize,
        field: usize,
        value: String,
    },
    #[error("record {record} has {found} fields, expected {expected}")]
    RaggedRecord {
        record: usize,
        expected: usize,
        found: usize,
    },
    #[error("{source_name} has {found} dimensions, previous inputs have {expected}")]
    DimensionMismatch {
        source_name: String,
        expected: usize,
        found: usize,
    },
    #[error("input contains no points")]
    Empty,
}
