use thiserror::Error;

// Unified error type for matrixcore

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("argument `{parameter}` must not be null or empty")]
    NullArgument { parameter: &'static str },
    #[error("argument `{parameter}` is out of range: {index} is not in [0, {bound})")]
    IndexOutOfRange {
        parameter: &'static str,
        index: usize,
        bound: usize,
    },
    #[error("argument `{parameter}` must be positive")]
    NonPositive { parameter: &'static str },
    #[error("dimension mismatch in `{parameter}`: {detail}")]
    DimensionMismatch {
        parameter: &'static str,
        detail: String,
    },
    #[error("invalid name for `{parameter}`: {reason}")]
    InvalidName {
        parameter: &'static str,
        reason: &'static str,
    },
    #[error("unsupported operation: {0}")]
    NotSupported(&'static str),
    #[error("`{parameter}` is rank deficient (rank {rank}, required {required})")]
    RankDeficient {
        parameter: &'static str,
        rank: usize,
        required: usize,
    },
    #[error("enumerator is {0}; there is no current element")]
    NoCurrentElement(&'static str),
    #[error("linear algebra backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, MatrixError>;

impl MatrixError {
    /// Name of the argument the error is about, if any.
    pub fn parameter(&self) -> Option<&'static str> {
        match self {
            MatrixError::NullArgument { parameter }
            | MatrixError::IndexOutOfRange { parameter, .. }
            | MatrixError::NonPositive { parameter }
            | MatrixError::DimensionMismatch { parameter, .. }
            | MatrixError::InvalidName { parameter, .. }
            | MatrixError::RankDeficient { parameter, .. } => Some(*parameter),
            MatrixError::NotSupported(_)
            | MatrixError::NoCurrentElement(_)
            | MatrixError::Backend(_)
            | MatrixError::Serialization(_) => None,
        }
    }

    pub(crate) fn mismatch(parameter: &'static str, detail: impl Into<String>) -> Self {
        MatrixError::DimensionMismatch {
            parameter,
            detail: detail.into(),
        }
    }
}

pub(crate) fn check_positive(value: usize, parameter: &'static str) -> Result<()> {
    if value == 0 {
        return Err(MatrixError::NonPositive { parameter });
    }
    Ok(())
}

pub(crate) fn check_index(index: usize, bound: usize, parameter: &'static str) -> Result<()> {
    if index >= bound {
        return Err(MatrixError::IndexOutOfRange {
            parameter,
            index,
            bound,
        });
    }
    Ok(())
}
