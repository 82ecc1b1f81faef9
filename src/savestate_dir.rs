use std::fs;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::config::SAVESTATE_EXTENSION;
use crate::error::{Result, SavestateError};

const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavestateEntry {
    pub name: String,
    pub path: PathBuf,
    /// Local modification time, "YYYY-MM-DD HH:MM:SS".
    pub modified: String,
}

/// Recursively collect the savestates under `dir`, optionally keeping only
/// those whose file name contains `search` (case-insensitive).
///
/// A missing directory yields an empty list.
pub fn list_savestates(dir: &Path, search: Option<&str>) -> Result<Vec<SavestateEntry>> {
    let search = search.map(str::to_lowercase).unwrap_or_default();
    let mut entries = Vec::new();
    if dir.is_dir() {
        collect(dir, &search, &mut entries)?;
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn collect(dir: &Path, search: &str, entries: &mut Vec<SavestateEntry>) -> Result<()> {
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = match dir_entry {
            Ok(dir_entry) => dir_entry,
            Err(err) => {
                log::warn!("skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        let path = dir_entry.path();
        if path.is_dir() {
            collect(&path, search, entries)?;
            continue;
        }
        if !is_savestate(&path) {
            continue;
        }

        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !search.is_empty() && !name.to_lowercase().contains(search) {
            continue;
        }
        let modified = match dir_entry.metadata().and_then(|metadata| metadata.modified()) {
            Ok(modified) => DateTime::<Local>::from(modified).format(MODIFIED_FORMAT).to_string(),
            Err(err) => {
                log::warn!("no modification time for {}: {}", path.display(), err);
                String::new()
            }
        };
        entries.push(SavestateEntry { name, path, modified });
    }
    Ok(())
}

fn is_savestate(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(SAVESTATE_EXTENSION))
}

/// Turn a savestate name into a path. Absolute paths are used as given;
/// anything else is looked up inside `dir` and may not climb out of it.
pub fn resolve_savestate(dir: &Path, name: &str) -> Result<PathBuf> {
    let requested = Path::new(name);
    let path = if requested.is_absolute() {
        requested.to_path_buf()
    } else {
        if name.is_empty() || requested.components().any(|part| !matches!(part, Component::Normal(_))) {
            return Err(SavestateError::InvalidName(name.to_string()));
        }
        dir.join(requested)
    };

    if !path.exists() {
        return Err(SavestateError::NotFound(path));
    }
    Ok(path)
}
