//! CSV file loading.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};

use super::parser::{CsvTable, parse_csv};

/// Maximum file size for CSV loading (50 MB default).
pub const MAX_CSV_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Reads and parses a CSV file.
pub fn read_csv_file(path: &Path) -> Result<CsvTable> {
    read_csv_file_with_limit(path, MAX_CSV_FILE_SIZE)
}

/// Reads and parses a CSV file, rejecting files larger than `max_size`.
///
/// UTF-16 files (detected by BOM) and invalid UTF-8 are rejected; a UTF-8
/// BOM is accepted and stripped.
pub fn read_csv_file_with_limit(path: &Path, max_size: u64) -> Result<CsvTable> {
    let metadata = fs::metadata(path).map_err(|e| map_open_error(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    let bytes = fs::read(path).map_err(|e| map_open_error(path, e))?;

    // Check for UTF-16 BOM (not supported)
    if bytes.len() >= 2 {
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    let text = String::from_utf8(bytes).map_err(|_| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;

    let table = parse_csv(&text);
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "parsed CSV file"
    );
    Ok(table)
}

fn map_open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_file() {
        let file = create_temp_csv(b"A,B,C\n1,2,3\n4,5,6\n");
        let table = read_csv_file(file.path()).unwrap();
        assert_eq!(table.headers, vec!["A", "B", "C"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_file(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_utf16_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0]);
        let result = read_csv_file(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let file = create_temp_csv(&[b'A', b',', 0xC3, 0x28]);
        let result = read_csv_file(file.path());
        assert!(matches!(result, Err(IngestError::InvalidUtf8 { .. })));
    }

    #[test]
    fn test_size_limit() {
        let file = create_temp_csv(b"A,B\n1,2\n");
        let result = read_csv_file_with_limit(file.path(), 4);
        assert!(matches!(result, Err(IngestError::FileTooLarge { .. })));
    }
}
