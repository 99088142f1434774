//! File system utility helpers (BOM-aware readers, etc.)

use std::fs;
use std::path::Path;

use crate::core::AnalyzerError;

/// Read a Small Basic source file as UTF-8 text, stripping the BOM if present.
/// Files saved by the Windows IDE usually carry one.
pub fn read_source(path: &Path) -> Result<String, AnalyzerError> {
    let mut content = fs::read_to_string(path).map_err(|source| AnalyzerError::SourceRead {
        path: path.to_path_buf(),
        source,
    })?;
    if content.starts_with('\u{FEFF}') {
        content = content.trim_start_matches('\u{FEFF}').to_string();
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_bom_is_stripped() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("\u{FEFF}x = 1\n".as_bytes()).unwrap();
        let content = read_source(file.path()).unwrap();
        assert_eq!(content, "x = 1\n");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_source(Path::new("/nonexistent/program.sb")).unwrap_err();
        assert!(err.to_string().contains("program.sb"));
    }
}
