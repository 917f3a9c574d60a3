//! Template materialization.
//! Copies an SDK example into a project directory and rewrites the pieces
//! that carry the project's identity.

use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::debug;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{read_ide_settings, ProjectIdentity};
use crate::constants::{
    BACKUP_SUFFIX, BUILD_CONFIG_FILE, GDB_SCRIPT_FILE, GIT_KEEP_FILE, IDE_DIR, IDE_SETTINGS_FILE,
    MARKER_FILE, TEMPLATE_FILES,
};
use crate::error::{Error, Result};
use crate::validation::{dir_is_empty, ensure_exists, PathType};

/// An example project shipped with the SDK: `<sdk>/Examples/<target>/<name>`.
#[derive(Debug, Clone)]
pub struct TemplateSource {
    pub sdk_root: PathBuf,
    pub target: String,
    pub name: String,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template '{}' for {}", self.name, self.target)
    }
}

impl TemplateSource {
    pub fn new(sdk_root: impl Into<PathBuf>, target: impl Into<String>, name: impl Into<String>) -> Self {
        Self { sdk_root: sdk_root.into(), target: target.into(), name: name.into() }
    }

    pub fn dir(&self) -> PathBuf {
        self.sdk_root.join("Examples").join(&self.target).join(&self.name)
    }

    /// Ensures the template directory holds every required file and returns it.
    ///
    /// A misspelled template name gets a "did you mean" tip from its sibling examples.
    pub fn validate(&self) -> Result<PathBuf> {
        let all_templates = self.sdk_root.join("Examples").join(&self.target);
        let dir = self.dir();
        ensure_exists(&dir, &self.to_string(), Some(PathType::Dir), Some(&all_templates))?;
        for (file, _) in TEMPLATE_FILES {
            ensure_exists(&dir.join(file), &format!("template {file}"), Some(PathType::File), None)?;
        }
        Ok(dir)
    }
}

/// How [`materialize`] treats the destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterializeOptions {
    /// Copy the template's `.vscode` directory
    pub include_vscode: bool,
    /// Keep `include/` representable in git
    pub with_git: bool,
    /// The destination is the user's working directory: never create it,
    /// move existing files aside instead of overwriting them, and refresh an
    /// existing marker instead of refusing.
    pub adopt: bool,
}

/// Path of the GDB flash script relative to the project root.
pub fn gdb_script_path(include_vscode: bool) -> String {
    if include_vscode {
        format!("{IDE_DIR}/{GDB_SCRIPT_FILE}")
    } else {
        GDB_SCRIPT_FILE.to_string()
    }
}

/// Writes a project skeleton from `template_dir` into `output_dir`.
///
/// The caller owns rollback: on error, whatever was written stays in place.
///
/// # Errors
/// * `Error::AlreadyInitialized` if the marker file exists and `adopt` is off
/// * `Error::NotFound` if `.vscode/settings.json` is missing while IDE config is requested
/// * `Error::IoError` for any filesystem failure
pub fn materialize(
    template_dir: &Path,
    output_dir: &Path,
    identity: &ProjectIdentity,
    options: MaterializeOptions,
) -> Result<()> {
    if !options.adopt {
        fs::create_dir_all(output_dir)?;
    }

    touch_marker(output_dir, options.adopt)?;

    let include_dir = output_dir.join("include");
    fs::create_dir_all(output_dir.join("src"))?;
    fs::create_dir_all(&include_dir)?;

    for (file, dest) in TEMPLATE_FILES {
        let dest = output_dir.join(dest);
        if options.adopt {
            move_aside(&dest)?;
        }
        debug!("Copying file: {}", dest.display());
        fs::copy(template_dir.join(file), &dest)?;
    }

    if options.with_git && dir_is_empty(&include_dir)? {
        File::create(include_dir.join(GIT_KEEP_FILE))?;
    }

    rewrite_build_config(&output_dir.join(BUILD_CONFIG_FILE), identity)?;

    let ide_src = template_dir.join(IDE_DIR);
    if options.include_vscode {
        let ide_dest = output_dir.join(IDE_DIR);
        if options.adopt && ide_dest.exists() {
            debug!("Keeping existing {}", ide_dest.display());
        } else {
            ensure_exists(&ide_src, "template .vscode directory", Some(PathType::Dir), None)?;
            copy_dir_all(&ide_src, &ide_dest)?;
            update_ide_board(&ide_dest, &identity.board)?;
        }
    } else {
        let script_src = ide_src.join(GDB_SCRIPT_FILE);
        if script_src.is_file() {
            let script_dest = output_dir.join(GDB_SCRIPT_FILE);
            if options.adopt {
                move_aside(&script_dest)?;
            }
            fs::copy(script_src, script_dest)?;
        }
    }

    Ok(())
}

fn touch_marker(output_dir: &Path, refresh: bool) -> Result<()> {
    let marker = output_dir.join(MARKER_FILE);
    if marker.exists() && !refresh {
        return Err(Error::AlreadyInitialized { path: marker });
    }
    File::options().create(true).append(true).open(&marker)?.set_modified(SystemTime::now())?;
    Ok(())
}

/// Renames `path` to `<path>.old` if it exists.
fn move_aside(path: &Path) -> Result<()> {
    if path.exists() {
        let mut backup = path.as_os_str().to_os_string();
        backup.push(".");
        backup.push(BACKUP_SUFFIX);
        debug!("Moving {} aside", path.display());
        fs::rename(path, backup)?;
    }
    Ok(())
}

/// Replaces the template's trailing placeholder line with the project's identity.
pub fn rewrite_build_config(path: &Path, identity: &ProjectIdentity) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    lines.pop();
    lines.push(format!("PROJECT={}", identity.name));
    lines.push(format!("BOARD={}", identity.board));
    lines.push(format!("TARGET={}\n", identity.target));
    lines.push("# Add any additional configs here!\n".to_string());
    fs::write(path, lines.join("\n"))?;
    Ok(())
}

/// Sets `board` in `<ide_dir>/settings.json`, keeping key order.
pub fn update_ide_board(ide_dir: &Path, board: &str) -> Result<()> {
    let settings_file = ide_dir.join(IDE_SETTINGS_FILE);
    ensure_exists(&settings_file, "template .vscode/settings.json", Some(PathType::File), None)?;

    let mut settings = read_ide_settings(&settings_file)?;
    settings.insert("board".to_string(), serde_json::Value::String(board.to_string()));

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    settings.serialize(&mut serializer)?;
    fs::write(settings_file, buf)?;
    Ok(())
}

/// Recursively copies `src` into `dest`.
pub fn copy_dir_all(src: &Path, dest: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::IoError(io::Error::new(io::ErrorKind::Other, e)))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            debug!("Copying file: {}", target.display());
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
