use crate::stackmap::Location;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expecting {expected} for line `{line}`, at {number}")]
    Format {
        line: String,
        number: usize,
        expected: String,
    },

    #[error("unknown location kind {kind} for line `{line}`, at {number}")]
    UnknownKind {
        kind: u8,
        line: String,
        number: usize,
    },

    #[error("unable to handle instruction `{line}`, at {number}")]
    UnsupportedInstruction { line: String, number: usize },

    #[error("unknown how to handle {location} in patch point {label}")]
    UnsupportedAddressing { location: Location, label: String },
}

impl Error {
    pub(crate) fn format(line: &str, number: usize, expected: impl Into<String>) -> Self {
        Error::Format {
            line: line.to_string(),
            number,
            expected: expected.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
