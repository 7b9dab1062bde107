//! Markdown and PDF renderings of a cached briefing.

pub mod layout;
pub mod markdown;
pub mod markup;
mod metrics;
pub mod pdf;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::week::WeekKey;

pub use markdown::MarkdownExporter;
pub use pdf::PdfExporter;

/// Where exports go when no directory is given: Documents, else the current directory.
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Write an export as `briefing-<week>.<extension>` inside `dir`.
pub fn save_export(content: &[u8], week: &WeekKey, extension: &str, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;

    let filepath = dir.join(format!("briefing-{}.{}", week, extension));
    fs::write(&filepath, content)
        .with_context(|| format!("Failed to write export file: {}", filepath.display()))?;

    Ok(filepath)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_export_filename() {
        let dir = tempfile::tempdir().unwrap();
        let week: WeekKey = "2026-W06".parse().unwrap();

        let path = save_export(b"# hi", &week, "md", dir.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "briefing-2026-W06.md");
        assert_eq!(fs::read(&path).unwrap(), b"# hi");
    }

    #[test]
    fn test_save_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("weekly");
        let week: WeekKey = "2026-W06".parse().unwrap();

        let path = save_export(b"%PDF", &week, "pdf", &nested).unwrap();
        assert!(path.starts_with(&nested));
    }
}
