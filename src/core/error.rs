use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TabconvError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("Malformed row at line {line}: expected at least 2 columns, got {columns}")]
    MalformedRow { line: u64, columns: usize },
    #[error("Malformed JSON: {0}")]
    MalformedJson(String),
    #[error("CSV error: {0}")]
    CsvError(String),
    #[error("Invalid mode '{0}': expected 'merge' or 'replace'")]
    InvalidMode(String),
}

impl TabconvError {
    /// Maps an error from opening `path`, keeping missing files distinct from other IO failures.
    pub fn opening(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => TabconvError::FileNotFound(path.display().to_string()),
            _ => TabconvError::IoError(format!("opening {}: {}", path.display(), err)),
        }
    }
}

impl From<std::io::Error> for TabconvError {
    fn from(err: std::io::Error) -> Self {
        TabconvError::IoError(err.to_string())
    }
}

impl From<csv::Error> for TabconvError {
    fn from(err: csv::Error) -> Self {
        TabconvError::CsvError(err.to_string())
    }
}
