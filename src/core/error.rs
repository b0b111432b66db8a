//! Error types for collation runs
//!
//! Only `RootDirectory` and `BaseDirectory` are fatal to a run. Everything else is
//! converted into a per-task outcome or a per-file placeholder by the collator.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while configuring or executing a collation run
#[derive(Debug, Error)]
pub enum CollateError {
    /// The base directory is a filesystem root, so it has no distinct parent for outputs
    #[error(
        "base directory {} is a filesystem root; cannot place output files in a distinct parent directory",
        .path.display()
    )]
    RootDirectory { path: PathBuf },

    /// The base directory could not be resolved to an absolute path
    #[error("cannot resolve base directory {}: {source}", .path.display())]
    BaseDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A `SRC=OUT` mapping could not be parsed
    #[error("invalid folder mapping '{spec}': {reason}")]
    InvalidMapping { spec: String, reason: String },

    /// The source folder itself could not be walked
    #[error("cannot read source folder {}: {message}", .path.display())]
    Walk { path: PathBuf, message: String },

    /// The output file could not be created or written
    #[error("could not write to output file {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A candidate file could not be read as UTF-8 text
    #[error("could not read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },
}

impl CollateError {
    /// Wrap an I/O error raised while writing `path`
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        CollateError::OutputWrite {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_directory_message() {
        let err = CollateError::RootDirectory {
            path: PathBuf::from("/"),
        };
        let msg = err.to_string();
        assert!(msg.contains("filesystem root"));
    }

    #[test]
    fn test_output_write_keeps_source() {
        let err = CollateError::output_write(
            "/tmp/out.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/out.txt"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_mapping_message() {
        let err = CollateError::InvalidMapping {
            spec: "foo".to_string(),
            reason: "expected SRC=OUT".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid folder mapping 'foo': expected SRC=OUT"
        );
    }
}
