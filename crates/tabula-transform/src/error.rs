use tabula_model::ModelError;
use tabula_rules::RuleError;
use thiserror::Error;

/// Transform failure. The input table is never modified when one is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{0}' already exists")]
    ColumnExists(String),

    #[error("Unknown operation type: {0}")]
    UnknownOperation(String),

    #[error("Invalid parameters for {operation}: {message}")]
    InvalidParameters { operation: String, message: String },

    #[error("Cannot divide by zero")]
    DivideByZero,

    #[error("Cannot apply {operation} to values less than or equal to zero")]
    NonPositiveLog { operation: &'static str },

    #[error("Cannot apply sqrt to negative values")]
    NegativeSqrt,

    #[error("Column '{0}' contains no numeric values")]
    NoNumericValues(String),

    #[error("Cannot normalize column '{column}': {reason}")]
    ConstantColumn {
        column: String,
        reason: &'static str,
    },

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TransformError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
