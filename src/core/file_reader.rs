//! Reading candidate files
//!
//! Content is taken verbatim and must be valid UTF-8. Anything else is a read
//! failure that the collator turns into a placeholder line.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::core::error::CollateError;

/// Why a candidate file could not be read
#[derive(Debug)]
pub enum ReadFailure {
    /// Opening or reading the file failed
    Io(io::Error),
    /// The bytes are not valid UTF-8
    InvalidUtf8 { valid_up_to: usize },
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFailure::Io(e) => write!(f, "{}", e),
            ReadFailure::InvalidUtf8 { valid_up_to } => {
                write!(f, "invalid UTF-8 sequence after byte {}", valid_up_to)
            }
        }
    }
}

impl ReadFailure {
    /// Attach the path so the failure can travel as a [`CollateError`]
    pub fn into_error(self, path: &Path) -> CollateError {
        CollateError::Read {
            path: path.to_path_buf(),
            reason: self.to_string(),
        }
    }
}

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String, ReadFailure> {
    let bytes = fs::read(path).map_err(ReadFailure::Io)?;
    String::from_utf8(bytes).map_err(|e| ReadFailure::InvalidUtf8 {
        valid_up_to: e.utf8_error().valid_up_to(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_success() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.ts");
        fs::write(&file_path, "export const x = 1;\r\n").unwrap();

        // Line endings are preserved
        let content = read_text(&file_path).unwrap();
        assert_eq!(content, "export const x = 1;\r\n");
    }

    #[test]
    fn test_read_text_keeps_bom() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("bom.cs");
        fs::write(&file_path, "\u{feff}class A {}").unwrap();

        assert_eq!(read_text(&file_path).unwrap(), "\u{feff}class A {}");
    }

    #[test]
    fn test_read_text_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("latin1.css");

        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(&[0x48, 0x69, 0xFF, 0xFE]).unwrap();

        match read_text(&file_path) {
            Err(ReadFailure::InvalidUtf8 { valid_up_to }) => assert_eq!(valid_up_to, 2),
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = read_text(Path::new("/nonexistent/file.ts"));
        assert!(matches!(result, Err(ReadFailure::Io(_))));
    }

    #[test]
    fn test_into_error_carries_path() {
        let failure = ReadFailure::InvalidUtf8 { valid_up_to: 0 };
        let err = failure.into_error(Path::new("src/a.ts"));
        assert!(err.to_string().contains("src/a.ts"));
        assert!(err.to_string().contains("invalid UTF-8"));
    }
}
