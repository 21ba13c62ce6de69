// Error taxonomy for the pipeline
//
// Only load-time failures are fatal. An identifier without a canonical
// name, a zero-expense percentage, or a filer with no rows in a relation
// all surface as missing values / empty tables, never as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A source file is missing or unreadable. Fatal: either all four
    /// relations load or none do.
    #[error("data file not found or unreadable: {}", .path.display())]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file opened but a row did not match the expected columns.
    #[error("malformed row in {}", .path.display())]
    MalformedData {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl PipelineError {
    /// The source file the failure points at.
    pub fn path(&self) -> &PathBuf {
        match self {
            PipelineError::DataUnavailable { path, .. } => path,
            PipelineError::MalformedData { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_names_the_file() {
        let err = PipelineError::DataUnavailable {
            path: PathBuf::from("/data/total_expenses.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("total_expenses.csv"), "message was: {msg}");
        assert_eq!(err.path(), &PathBuf::from("/data/total_expenses.csv"));
    }
}
