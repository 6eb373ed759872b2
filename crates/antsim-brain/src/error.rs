use thiserror::Error;

/// Errors raised by network construction, evaluation and persistence
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Forward pass called with the wrong number of inputs
    #[error("input has {actual} values but the network expects {expected}")]
    InputSizeMismatch { expected: usize, actual: usize },

    /// Two networks combined in one operation have different layer layouts
    #[error("network topologies differ ({left} vs {right})")]
    TopologyMismatch { left: String, right: String },

    /// Stored weights do not fit the network they are loaded into
    #[error(
        "transition {transition} stores {found_rows}x{found_cols} weights, expected {expected_rows}x{expected_cols}"
    )]
    DimensionMismatch {
        transition: usize,
        expected_rows: usize,
        expected_cols: usize,
        found_rows: usize,
        found_cols: usize,
    },

    /// Stored layer count does not match the network
    #[error("stored network has {found} layers, expected {expected}")]
    LayerCountMismatch { expected: usize, found: usize },

    /// Layer list that cannot form a network
    #[error("invalid topology: {0}")]
    InvalidTopology(&'static str),

    #[error("weight I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
