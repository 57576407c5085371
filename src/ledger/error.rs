use thiserror::Error;

pub type RecordResult<T> = Result<T, RecordError>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("row {id}: timestamp {raw:?} does not match `YYYY-MM-DD HH:MM:SS.mmm`")]
    InvalidTimestamp { id: String, raw: String },

    #[error("row {id}: {field} {raw:?} is not a number")]
    InvalidNumber {
        id: String,
        field: &'static str,
        raw: String,
    },

    #[error("row {id}: missing {field}")]
    MissingField { id: String, field: &'static str },

    #[error("{source_name} line {line}: {message}")]
    Malformed {
        source_name: String,
        line: u64,
        message: String,
    },
}
