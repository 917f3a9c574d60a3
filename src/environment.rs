//! Resolution of the SDK installation and the external tools it ships.

use std::cmp::Ordering;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use log::debug;

use crate::constants::SDK_ENV_VAR;
use crate::error::{Error, Result};
use crate::validation::{ensure_exists, subdirectory_names, PathType};

/// Reads `MAXIM_PATH` and validates it as a MaximSDK installation.
pub fn resolve_sdk_root() -> Result<PathBuf> {
    sdk_root_from(env::var_os(SDK_ENV_VAR))
}

/// Validates a candidate SDK root taken from the environment.
///
/// # Errors
/// * `Error::ConfigMissing` if the variable is unset or empty
/// * `Error::NotFound` if the root or its `Examples` directory is missing
pub fn sdk_root_from(value: Option<OsString>) -> Result<PathBuf> {
    let root = match value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => {
            return Err(Error::ConfigMissing {
                what: format!("{SDK_ENV_VAR} environment variable not set"),
                hint: Some(format!(
                    "set it to your MaximSDK installation directory, e.g. in ~/.bashrc:\n  export {SDK_ENV_VAR}=\"$HOME/MaximSDK\""
                )),
            })
        }
    };

    ensure_exists(&root, SDK_ENV_VAR, Some(PathType::Dir), None)?;
    ensure_exists(&root.join("Examples"), "Examples directory", Some(PathType::Dir), None)
        .map_err(|err| {
            err.with_hint(format!(
                "{SDK_ENV_VAR} does not appear to be a valid MaximSDK installation"
            ))
        })?;

    debug!("Using MaximSDK at {}", root.display());
    Ok(root)
}

/// Splits a version directory name into numeric components.
///
/// Non-numeric components compare as their leading digits (or zero).
fn version_key(name: &str) -> Vec<u64> {
    name.split('.')
        .map(|part| {
            let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().unwrap_or(0)
        })
        .collect()
}

fn compare_versions(a: &str, b: &str) -> Ordering {
    version_key(a).cmp(&version_key(b))
}

/// Picks the newest GCC toolchain under `Tools/GNUTools` and returns its `bin` directory.
///
/// Versions are ordered numerically, so `1.10.0` beats `1.9.5`.
pub fn find_toolchain(sdk_root: &Path) -> Result<PathBuf> {
    let tools_dir = sdk_root.join("Tools").join("GNUTools");
    ensure_exists(&tools_dir, "GNU toolchain directory", Some(PathType::Dir), None)?;

    let newest = subdirectory_names(&tools_dir)?
        .into_iter()
        .filter(|name| name.starts_with(|c: char| c.is_ascii_digit()))
        .max_by(|a, b| compare_versions(a, b))
        .ok_or_else(|| Error::MissingTool {
            tool: "GCC toolchain".to_string(),
            hint: Some(format!(
                "no version directories found in '{}'; reinstall the MaximSDK toolchain",
                tools_dir.display()
            )),
        })?;

    let bin_dir = tools_dir.join(&newest).join("bin");
    ensure_exists(&bin_dir, &format!("GCC toolchain {newest} bin directory"), Some(PathType::Dir), None)?;
    debug!("Selected toolchain {} at {}", newest, bin_dir.display());
    Ok(bin_dir)
}

/// Resolves the OpenOCD installation directory.
///
/// A declared path wins; otherwise `Tools/OpenOCD` under the SDK root is
/// used. `sdk_root` is only consulted when nothing was declared.
pub fn find_debug_tool_dir<F>(declared: Option<&Path>, sdk_root: F) -> Result<PathBuf>
where
    F: FnOnce() -> Result<PathBuf>,
{
    let ocd_dir = match declared {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => sdk_root()?.join("Tools").join("OpenOCD"),
    };

    if !ocd_dir.exists() {
        return Err(Error::NotFound {
            description: "OpenOCD tools directory".to_string(),
            path: ocd_dir,
            hint: Some(format!(
                "ensure {SDK_ENV_VAR} points to a valid MaximSDK installation, or set [paths].ocd_path"
            )),
        });
    }
    Ok(ocd_dir)
}

/// Directory holding the OpenOCD executable: `<ocd>/bin` when present, else `<ocd>` itself.
pub fn debug_tool_bin(ocd_dir: &Path) -> PathBuf {
    let bin_dir = ocd_dir.join("bin");
    if bin_dir.is_dir() {
        bin_dir
    } else {
        ocd_dir.to_path_buf()
    }
}

/// Searches `PATH` for an executable named `program`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    let file_name = format!("{program}{}", env::consts::EXE_SUFFIX);
    env::split_paths(&path).map(|dir| dir.join(&file_name)).find(|candidate| candidate.is_file())
}
