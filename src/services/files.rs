//! Reading sources and saving refactored output

use crate::error::{RefactorError, Result};
use crate::model::archive::ArchiveHandle;
use crate::model::source::Language;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ARCHIVE_FILE_NAME: &str = "refactored-project.zip";

/// File name used for a single refactored file, e.g. `refactored_code.jsx`
pub fn refactored_file_name(language: Language) -> String {
    format!("refactored_code.{}", language.extension())
}

/// Write `code` as `refactored_code.<ext>` inside `dir`
pub fn save_refactored_code(dir: &Path, language: Language, code: &str) -> Result<PathBuf> {
    if code.is_empty() {
        return Err(RefactorError::Validation(
            "Please refactor some code first.".to_string(),
        ));
    }
    fs::create_dir_all(dir)?;
    let path = dir.join(refactored_file_name(language));
    fs::write(&path, code)?;
    info!(path = %path.display(), "saved refactored code");
    Ok(path)
}

/// Copy the fetched archive to `refactored-project.zip` inside `dir`
pub fn save_archive(dir: &Path, archive: &ArchiveHandle) -> Result<PathBuf> {
    let path = dir.join(ARCHIVE_FILE_NAME);
    archive.save_as(&path)?;
    info!(path = %path.display(), size = archive.size(), "saved project archive");
    Ok(path)
}

/// Read a file chosen by the user, rejecting empty content
pub fn read_source_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(RefactorError::Validation(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(content)
}

/// True when the path looks like a zip archive
pub fn is_zip_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}
