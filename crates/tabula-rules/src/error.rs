use tabula_model::ModelError;
use thiserror::Error;

/// Rule evaluation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Operator 'in' requires an array value")]
    InRequiresList,

    #[error("Operator 'between' requires a second value")]
    MissingSecondValue,

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Rule group must contain at least one condition")]
    EmptyGroup,

    #[error("NOT group must contain exactly one condition, found {0}")]
    NotArity(usize),

    #[error("Invalid rule set: {0}")]
    Parse(String),

    #[error(transparent)]
    Model(#[from] ModelError),
}
