//! Read-only checks on filesystem paths, names and SDK layout.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::constants::{DEFAULT_BSP, MARKER_FILE};
use crate::error::{Error, Result};

static CONVENTIONAL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("name pattern is valid"));

/// Kind of filesystem entry a path is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathType {
    File,
    Dir,
}

impl PathType {
    fn matches(self, path: &Path) -> bool {
        match self {
            PathType::File => path.is_file(),
            PathType::Dir => path.is_dir(),
        }
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathType::File => write!(f, "file"),
            PathType::Dir => write!(f, "directory"),
        }
    }
}

/// Ensures `path` exists and, if `path_type` is given, is of that kind.
///
/// When `similar_in` is given, its immediate children are scanned for a name
/// that case-insensitively contains (or is contained by) the requested name,
/// and the first hit is offered as a "did you mean" tip.
///
/// # Errors
/// * `Error::NotFound` if the path does not exist
/// * `Error::WrongType` if it exists but is of the wrong kind
pub fn ensure_exists(
    path: &Path,
    description: &str,
    path_type: Option<PathType>,
    similar_in: Option<&Path>,
) -> Result<()> {
    let exists = path.exists();
    if exists && path_type.map_or(true, |kind| kind.matches(path)) {
        return Ok(());
    }

    let hint = similar_in
        .and_then(|dir| find_similar(path, dir, path_type))
        .map(|name| format!("did you mean '{name}'?"));

    Err(match path_type {
        Some(expected) if exists => Error::WrongType {
            description: description.to_string(),
            path: path.to_path_buf(),
            expected,
            hint,
        },
        _ => Error::NotFound {
            description: description.to_string(),
            path: path.to_path_buf(),
            hint,
        },
    })
}

fn find_similar(path: &Path, dir: &Path, path_type: Option<PathType>) -> Option<String> {
    let wanted = path.file_name()?.to_string_lossy().to_lowercase();
    let mut candidates: Vec<PathBuf> =
        fs::read_dir(dir).ok()?.filter_map(|entry| entry.ok().map(|e| e.path())).collect();
    candidates.sort();

    candidates
        .into_iter()
        .filter(|candidate| path_type.map_or(true, |kind| kind.matches(candidate)))
        .filter_map(|candidate| {
            candidate.file_name().map(|name| name.to_string_lossy().into_owned())
        })
        .find(|name| {
            let lower = name.to_lowercase();
            lower.contains(&wanted) || wanted.contains(&lower)
        })
}

/// Ensures a name starts with a letter followed only by letters, digits, `-` or `_`.
///
/// File names are checked with only their last extension removed, so any
/// path separator fails the check.
pub fn ensure_conventional_name(name: &str, is_directory: bool) -> Result<()> {
    let (stem, kind) = if is_directory {
        (name, "directory")
    } else {
        let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
        (stem, "file")
    };

    if CONVENTIONAL_NAME.is_match(stem) {
        Ok(())
    } else {
        Err(Error::InvalidName { name: name.to_string(), kind })
    }
}

/// Ensures `dir` is a project root, i.e. holds the marker file.
pub fn ensure_project_dir(dir: &Path) -> Result<()> {
    if dir.join(MARKER_FILE).is_file() {
        return Ok(());
    }
    Err(Error::Validation {
        message: format!("current directory is not an msdk project directory: '{}'", dir.display()),
        hint: Some(
            "run 'msdk init <name>' to create a new project, or 'msdk init . --allow-cwd' to adopt this directory"
                .to_string(),
        ),
    })
}

/// Returns true if the directory has no entries at all.
pub fn dir_is_empty(dir: &Path) -> Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Sorted names of the immediate subdirectories of `dir`.
pub fn subdirectory_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Upper-cases a target identifier; bare part numbers get the `MAX` prefix.
pub fn normalize_target(target: &str) -> String {
    let target = target.trim().to_uppercase();
    if target.starts_with(|c: char| c.is_ascii_digit()) {
        format!("MAX{target}")
    } else {
        target
    }
}

/// Ensures the SDK ships examples for `target` and returns that directory.
pub fn validate_target(target: &str, sdk_root: &Path) -> Result<PathBuf> {
    let examples_dir = sdk_root.join("Examples");
    ensure_exists(&examples_dir, "MaximSDK Examples directory", Some(PathType::Dir), None)?;

    let target_dir = examples_dir.join(target);
    if !target_dir.is_dir() {
        let available = subdirectory_names(&examples_dir)?;
        return Err(Error::NotFound {
            description: format!("target '{target}'"),
            path: target_dir,
            hint: Some(format!("available targets: {}", available.join(", "))),
        });
    }
    debug!("Target '{}' found at {}", target, target_dir.display());
    Ok(target_dir)
}

/// Ensures the board support package exists for `target` and returns its directory.
pub fn validate_bsp(target: &str, bsp: &str, sdk_root: &Path) -> Result<PathBuf> {
    let boards_dir = sdk_root.join("Libraries").join("Boards");
    ensure_exists(&boards_dir, "MaximSDK BSP libraries directory", Some(PathType::Dir), None)?;

    let target_boards_dir = boards_dir.join(target);
    ensure_exists(
        &target_boards_dir,
        &format!("MaximSDK BSP libraries directory for {target}"),
        Some(PathType::Dir),
        None,
    )?;

    let bsp_dir = target_boards_dir.join(bsp);
    let similar_in = (bsp != DEFAULT_BSP).then_some(target_boards_dir.as_path());
    match ensure_exists(
        &bsp_dir,
        &format!("board support package '{bsp}' for {target}"),
        Some(PathType::Dir),
        similar_in,
    ) {
        Ok(()) => Ok(bsp_dir),
        Err(err) => {
            let available = subdirectory_names(&target_boards_dir)?;
            Err(err.with_hint(format!("available BSPs: {}", available.join(", "))))
        }
    }
}

/// Validates the project's directory name and where it is going to live.
///
/// Existing directories are accepted; re-initialization is caught later by
/// the marker and config-file guards.
pub fn validate_project_name(name: &str, parent_dir: &Path) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("project name cannot be empty"));
    }
    ensure_conventional_name(name, true)?;

    if !parent_dir.exists() {
        return Err(Error::NotFound {
            description: "parent directory".to_string(),
            path: parent_dir.to_path_buf(),
            hint: Some("create the parent directories first or use a different path".to_string()),
        });
    }

    let project_path = parent_dir.join(name);
    if project_path.is_file() {
        return Err(Error::WrongType {
            description: "project path".to_string(),
            path: project_path,
            expected: PathType::Dir,
            hint: Some("choose a different name".to_string()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_target() {
        assert_eq!(normalize_target("max32655"), "MAX32655");
        assert_eq!(normalize_target(" 32690 "), "MAX32690");
        assert_eq!(normalize_target("MAX78000"), "MAX78000");
    }

    #[test]
    fn test_path_type_display() {
        assert_eq!(PathType::File.to_string(), "file");
        assert_eq!(PathType::Dir.to_string(), "directory");
    }
}
