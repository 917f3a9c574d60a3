//! Project configuration handling.
//! This module derives `msdk-proj.toml` from a template's IDE settings at
//! init time and loads it back for `flash` and `run`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILE, DEFAULT_INTERFACE_FILE, PROGRAM_FILE_TOKEN, PROJECT_NAME_TOKEN,
};
use crate::environment::{find_debug_tool_dir, resolve_sdk_root};
use crate::error::{Error, Result};

/// IDE settings document (`.vscode/settings.json`), in file order.
pub type IdeSettings = IndexMap<String, serde_json::Value>;

/// Who a project is: its name, the device it targets and the board it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    pub name: String,
    pub target: String,
    pub board: String,
}

/// File names the debugger needs, as derived from the IDE settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashFields {
    pub program_file: String,
    pub symbol_file: String,
    pub interface_file: String,
    pub target_file: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    pub target: String,
    pub board: String,
    pub name: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashSection {
    pub program_file: String,
    pub symbol_file: String,
    pub interface_file: String,
    pub target_file: String,
    pub gdb_script: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsSection {
    /// Empty means "derive from MAXIM_PATH"
    pub ocd_path: String,
}

/// On-disk shape of `msdk-proj.toml`.
///
/// Sections are optional here so that a missing section is reported as a
/// validation failure rather than a syntax error.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flash: Option<FlashSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsSection>,
}

/// Fully validated configuration used by `flash` and `run`.
#[derive(Debug, Clone)]
pub struct FlashConfig {
    pub identity: ProjectIdentity,
    pub program_file: String,
    pub symbol_file: String,
    pub interface_file: String,
    pub target_file: String,
    /// Absolute path to the GDB flash script
    pub gdb_script: PathBuf,
    /// OpenOCD installation directory
    pub ocd_path: PathBuf,
}

/// Reads a JSON IDE settings file preserving key order.
pub fn read_ide_settings(path: &Path) -> Result<IdeSettings> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn setting<'a>(settings: &'a IdeSettings, key: &str) -> Option<&'a str> {
    settings.get(key).and_then(|value| value.as_str())
}

/// Extracts the debugger file names from the IDE settings.
///
/// Placeholders are resolved by plain string replacement, in order: the
/// project-name token in `program_file` first, then both tokens in
/// `symbol_file` using the already resolved program file.
pub fn derive_flash_fields(settings: &IdeSettings, project_name: &str) -> FlashFields {
    let program_file = setting(settings, "program_file")
        .map(str::to_string)
        .unwrap_or_else(|| format!("{PROJECT_NAME_TOKEN}.elf"))
        .replace(PROJECT_NAME_TOKEN, project_name);

    let symbol_file = setting(settings, "symbol_file")
        .unwrap_or(&program_file)
        .replace(PROGRAM_FILE_TOKEN, &program_file)
        .replace(PROJECT_NAME_TOKEN, project_name);

    FlashFields {
        program_file,
        symbol_file,
        interface_file: setting(settings, "M4_OCD_interface_file")
            .unwrap_or(DEFAULT_INTERFACE_FILE)
            .to_string(),
        target_file: setting(settings, "M4_OCD_target_file").unwrap_or_default().to_string(),
    }
}

impl ProjectConfig {
    pub fn new(identity: &ProjectIdentity, fields: FlashFields, gdb_script: &str) -> Self {
        Self {
            project: Some(ProjectSection {
                target: identity.target.clone(),
                board: identity.board.clone(),
                name: identity.name.clone(),
            }),
            flash: Some(FlashSection {
                program_file: fields.program_file,
                symbol_file: fields.symbol_file,
                interface_file: fields.interface_file,
                target_file: fields.target_file,
                gdb_script: gdb_script.to_string(),
            }),
            paths: Some(PathsSection::default()),
        }
    }

    /// Reads and parses `msdk-proj.toml` from `project_dir` without validating it.
    ///
    /// # Errors
    /// * `Error::ConfigMissing` if the file does not exist
    /// * `Error::Parse` if it is not valid TOML
    pub fn read(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::ConfigMissing {
                    what: format!("project configuration not found: '{CONFIG_FILE}'"),
                    hint: Some(
                        "run 'msdk init . --allow-cwd' to reinitialize the project configuration"
                            .to_string(),
                    ),
                })
            }
            Err(e) => return Err(Error::IoError(e)),
        };

        debug!("Loading configuration from {}", path.display());
        toml::from_str(&content).map_err(|source| Error::Parse { path, source })
    }

    /// Checks that both required sections and all of their fields are present and non-empty.
    pub fn validate(&self) -> Result<(&ProjectSection, &FlashSection)> {
        let project = self.project.as_ref().ok_or_else(|| missing_section("project"))?;
        let flash = self.flash.as_ref().ok_or_else(|| missing_section("flash"))?;

        let required = [
            ("project", "target", &project.target),
            ("project", "board", &project.board),
            ("project", "name", &project.name),
            ("flash", "program_file", &flash.program_file),
            ("flash", "symbol_file", &flash.symbol_file),
            ("flash", "interface_file", &flash.interface_file),
            ("flash", "target_file", &flash.target_file),
            ("flash", "gdb_script", &flash.gdb_script),
        ];
        if let Some((section, field, _)) =
            required.iter().find(|(_, _, value)| value.trim().is_empty())
        {
            return Err(Error::Validation {
                message: format!("missing required field in '{CONFIG_FILE}': [{section}].{field}"),
                hint: Some(format!("edit '{CONFIG_FILE}' and fill in [{section}].{field}")),
            });
        }

        Ok((project, flash))
    }
}

fn missing_section(section: &str) -> Error {
    Error::Validation {
        message: format!("missing required section in '{CONFIG_FILE}': [{section}]"),
        hint: None,
    }
}

/// Serializes a new project configuration into `output_dir`.
///
/// # Errors
/// * `Error::AlreadyInitialized` if `msdk-proj.toml` already exists
pub fn write_project_config(
    output_dir: &Path,
    identity: &ProjectIdentity,
    fields: FlashFields,
    gdb_script: &str,
) -> Result<PathBuf> {
    let path = output_dir.join(CONFIG_FILE);
    if path.exists() {
        return Err(Error::AlreadyInitialized { path });
    }

    let config = ProjectConfig::new(identity, fields, gdb_script);
    fs::write(&path, toml::to_string(&config)?)?;
    debug!("Wrote project configuration to {}", path.display());
    Ok(path)
}

/// Loads `msdk-proj.toml` from `project_dir`, resolving OpenOCD from `MAXIM_PATH` if needed.
pub fn load_flash_config(project_dir: &Path) -> Result<FlashConfig> {
    load_flash_config_with(project_dir, resolve_sdk_root)
}

/// Like [`load_flash_config`], with the SDK root lookup supplied by the caller.
pub fn load_flash_config_with<F>(project_dir: &Path, sdk_root: F) -> Result<FlashConfig>
where
    F: FnOnce() -> Result<PathBuf>,
{
    let config = ProjectConfig::read(project_dir)?;
    let (project, flash) = config.validate()?;

    let gdb_script = project_dir.join(&flash.gdb_script);
    if !gdb_script.exists() {
        return Err(Error::NotFound {
            description: "GDB flash script".to_string(),
            path: gdb_script,
            hint: Some(format!(
                "this file is copied during 'msdk init'; the template keeps it in \
                 '$MAXIM_PATH/Examples/{}/<template>/.vscode/flash.gdb'",
                project.target
            )),
        });
    }

    let declared = config.paths.as_ref().map(|paths| Path::new(&paths.ocd_path));
    let ocd_path = find_debug_tool_dir(declared, sdk_root)?;

    Ok(FlashConfig {
        identity: ProjectIdentity {
            name: project.name.clone(),
            target: project.target.clone(),
            board: project.board.clone(),
        },
        program_file: flash.program_file.clone(),
        symbol_file: flash.symbol_file.clone(),
        interface_file: flash.interface_file.clone(),
        target_file: flash.target_file.clone(),
        gdb_script,
        ocd_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings(pairs: &[(&str, &str)]) -> IdeSettings {
        pairs.iter().map(|(k, v)| (k.to_string(), json!(v))).collect()
    }

    #[test]
    fn test_chained_placeholders_resolve_in_order() {
        let settings = settings(&[
            ("program_file", "${config:project_name}.elf"),
            ("symbol_file", "${config:program_file}"),
        ]);
        let fields = derive_flash_fields(&settings, "demo");
        assert_eq!(fields.program_file, "demo.elf");
        assert_eq!(fields.symbol_file, "demo.elf");
    }

    #[test]
    fn test_defaults_when_settings_are_empty() {
        let fields = derive_flash_fields(&IdeSettings::new(), "blinky");
        assert_eq!(fields.program_file, "blinky.elf");
        assert_eq!(fields.symbol_file, "blinky.elf");
        assert_eq!(fields.interface_file, "cmsis-dap.cfg");
        assert_eq!(fields.target_file, "");
    }

    #[test]
    fn test_symbol_file_may_reference_project_name() {
        let settings = settings(&[
            ("program_file", "firmware.bin"),
            ("symbol_file", "${config:project_name}-syms.elf"),
            ("M4_OCD_interface_file", "jlink.cfg"),
            ("M4_OCD_target_file", "max32655.cfg"),
        ]);
        let fields = derive_flash_fields(&settings, "demo");
        assert_eq!(fields.program_file, "firmware.bin");
        assert_eq!(fields.symbol_file, "demo-syms.elf");
        assert_eq!(fields.interface_file, "jlink.cfg");
        assert_eq!(fields.target_file, "max32655.cfg");
    }
}
