/*!
 * Filesystem helpers: atomic writes, subtitle discovery, format sniffing.
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::subtitle_processor::SubtitleFormat;

/// What a discovered file looks like to us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Subtitle(SubtitleFormat),
    Unknown,
}

/// Stateless filesystem operations
pub struct FileManager;

impl FileManager {
    /// Read a whole file as UTF-8, stripping a BOM if present
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(content.strip_prefix('\u{FEFF}').unwrap_or(&content).to_string())
    }

    /// Write a file atomically: temp file in the target directory, then rename
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let dir = match dir {
            Some(d) => d.to_path_buf(),
            None => PathBuf::from("."),
        };

        Self::ensure_dir(&dir)?;
        let temp = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        fs::write(temp.path(), content)
            .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
        temp.persist(path)
            .with_context(|| format!("Failed to move temp file into place: {}", path.display()))?;
        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(())
    }

    pub fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Classify a path by extension
    pub fn detect_file_type(path: &Path) -> FileType {
        match SubtitleFormat::from_extension(path) {
            Some(format) => FileType::Subtitle(format),
            None => FileType::Unknown,
        }
    }

    /// Recursively collect subtitle files under a directory, sorted by path
    pub fn find_subtitle_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| matches!(Self::detect_file_type(path), FileType::Subtitle(_)))
            .collect();
        files.sort();
        debug!("Found {} subtitle file(s) under {}", files.len(), dir.display());
        Ok(files)
    }
}
