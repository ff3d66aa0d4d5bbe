use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why the trip dataset could not be loaded. Either variant ends the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn parse(path: &Path, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Map a `csv` failure, keeping a missing file distinct from everything else.
    pub fn from_csv(path: &Path, err: csv::Error) -> Self {
        if let csv::ErrorKind::Io(io_err) = err.kind() {
            if io_err.kind() == io::ErrorKind::NotFound {
                return Self::NotFound {
                    path: path.to_path_buf(),
                };
            }
        }
        Self::parse(path, err.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_path() {
        let err = LoadError::NotFound {
            path: PathBuf::from("trips.csv"),
        };
        assert_eq!(err.to_string(), "dataset file not found: trips.csv");

        let err = LoadError::parse(Path::new("trips.csv"), "row 3: bad DateTime");
        assert_eq!(
            err.to_string(),
            "failed to read trips.csv: row 3: bad DateTime"
        );
        assert!(!err.is_not_found());
    }
}
