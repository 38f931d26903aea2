use thiserror::Error;

#[derive(Debug, Error)]
pub enum MmxError {
    /// The formula contained no base variable.
    #[error("empty or malformed formula")]
    EmptyFormula,

    /// The formula nests more wrapper calls than the parser will follow.
    #[error("formula nests deeper than {limit} calls")]
    NestingTooDeep { limit: usize },

    /// A formula failed the strict pre-flight check.
    #[error("invalid formula '{formula}': {reason}")]
    InvalidFormula { formula: String, reason: String },

    /// A transformation names a column the dataset does not have.
    #[error("variable '{name}' not found in dataset")]
    UnknownVariable { name: String },

    /// A date-range bound could not be read as a calendar day.
    #[error("invalid date '{value}'")]
    InvalidDate { value: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, MmxError>;
