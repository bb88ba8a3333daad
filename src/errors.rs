use thiserror::Error;

/// An error raised while setting up or running a grid synthesis search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridSynthError {
    /// An interval was constructed with its bounds in the wrong order.
    #[error("interval lower bound {lo} exceeds upper bound {hi}")]
    InvalidInterval {
        /// Debug rendering of the lower bound.
        lo: String,
        /// Debug rendering of the upper bound.
        hi: String,
    },
    /// An ellipse was not given by a positive definite quadratic form.
    #[error("invalid ellipse: {0}")]
    InvalidEllipse(String),
    /// A matrix does not describe a grid operator with a unit determinant.
    #[error("invalid grid operator: {0}")]
    InvalidGridOperator(String),
    /// Search parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GridSynthError {
    /// Construct a new configuration error.
    pub fn config<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidConfig(msg.into())
    }

    /// Construct a new ellipse error.
    pub fn ellipse<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidEllipse(msg.into())
    }

    /// Construct a new grid operator error.
    pub fn grid_op<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidGridOperator(msg.into())
    }
}

/// A result which may contain a grid synthesis error.
pub type GridSynthResult<T> = Result<T, GridSynthError>;
