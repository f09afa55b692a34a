//! Error types for data-feed validation and configuration parsing.

/// A data record that cannot become a marker.
///
/// Every variant names the record by its position in the feed and its label so
/// the offending entry can be found in the source data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("record {index} ({name:?}): missing latlng")]
    MissingCoordinate { index: usize, name: String },

    #[error("record {index} ({name:?}): latlng must have exactly 2 entries, got {len}")]
    CoordinateArity {
        index: usize,
        name: String,
        len: usize,
    },

    #[error("record {index} ({name:?}): latlng is not finite")]
    NonFiniteCoordinate { index: usize, name: String },

    #[error("record {index} ({name:?}): population {value} is not finite")]
    NonFinitePopulation {
        index: usize,
        name: String,
        value: f64,
    },

    #[error("record {index} ({name:?}): population {value} is negative")]
    NegativePopulation {
        index: usize,
        name: String,
        value: f64,
    },

    #[error("record {index} ({name:?}): population {text:?} is not a number")]
    UnparseablePopulation {
        index: usize,
        name: String,
        text: String,
    },
}

impl RecordError {
    /// Position of the rejected record in its feed.
    pub fn index(&self) -> usize {
        match self {
            Self::MissingCoordinate { index, .. }
            | Self::CoordinateArity { index, .. }
            | Self::NonFiniteCoordinate { index, .. }
            | Self::NonFinitePopulation { index, .. }
            | Self::NegativePopulation { index, .. }
            | Self::UnparseablePopulation { index, .. } => *index,
        }
    }
}

/// Errors that can occur when parsing configuration or feed JSON.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse the globe configuration.
    #[error("failed to parse config: {0}")]
    ParseConfig(#[source] serde_json::Error),

    /// Failed to parse the record feed.
    #[error("failed to parse feed: {0}")]
    ParseFeed(#[source] serde_json::Error),
}
