//! File-system discovery of numbered change scripts
//!
//! Scripts live directly in the scripts directory (folder = that directory's
//! name) or one level below it (folder = sub-directory name). Every `.sql`
//! file name must begin with its script number.

use crate::error::{CoreError, CoreResult};
use crate::script::ChangeScript;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Leading script number in a file name, e.g. `001` in `001_create_users.sql`
static SCRIPT_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn script_number_regex() -> &'static Regex {
    SCRIPT_NUMBER_RE.get_or_init(|| Regex::new(r"^(\d+)").expect("valid regex"))
}

/// Discover all change scripts under `dir`.
///
/// The result is sorted by folder then file name but is neither deduplicated
/// nor checked for gaps; that is the change script set's job.
pub fn discover_scripts(dir: &Path) -> CoreResult<Vec<ChangeScript>> {
    if !dir.is_dir() {
        return Err(CoreError::ScriptsDirNotFound {
            path: dir.display().to_string(),
        });
    }

    let root_folder = dir
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Scripts")
        .to_string();

    let mut scripts = Vec::new();
    let mut sub_dirs = Vec::new();

    for path in sorted_entries(dir)? {
        if path.is_dir() {
            sub_dirs.push(path);
        } else if is_sql_file(&path) {
            scripts.push(read_script(&root_folder, &path)?);
        }
    }

    for sub_dir in sub_dirs {
        let Some(folder) = sub_dir.file_name().and_then(|n| n.to_str()) else {
            log::warn!("Skipping non UTF-8 directory {}", sub_dir.display());
            continue;
        };
        let folder = folder.to_string();
        for path in sorted_entries(&sub_dir)? {
            if path.is_file() && is_sql_file(&path) {
                scripts.push(read_script(&folder, &path)?);
            }
        }
    }

    log::debug!("Discovered {} change scripts in {}", scripts.len(), dir.display());
    Ok(scripts)
}

fn sorted_entries(dir: &Path) -> CoreResult<Vec<std::path::PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;
    collect_sorted(dir, entries.map(|entry| entry.map(|e| e.path())))
}

/// Sorted paths; the first unreadable entry fails the whole listing
fn collect_sorted(
    dir: &Path,
    entries: impl Iterator<Item = std::io::Result<std::path::PathBuf>>,
) -> CoreResult<Vec<std::path::PathBuf>> {
    let mut paths = entries
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CoreError::IoWithPath {
            path: dir.display().to_string(),
            source: e,
        })?;
    paths.sort();
    Ok(paths)
}

fn is_sql_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}

/// Parse the script number from a file name.
pub fn parse_script_number(file_name: &str) -> CoreResult<u64> {
    script_number_regex()
        .captures(file_name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| CoreError::UnrecognisedFilename {
            file: file_name.to_string(),
        })
}

fn read_script(folder: &str, path: &Path) -> CoreResult<ChangeScript> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CoreError::UnrecognisedFilename {
            file: path.display().to_string(),
        })?;
    let number = parse_script_number(file_name)?;
    let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(ChangeScript::new(folder, number, file_name, content))
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
