//! Project generation pipeline.
//!
//! template and git pre-flight -> materialization -> project config -> git.
//! Any failure removes the project directory if this run created it.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};

use crate::config::{derive_flash_fields, read_ide_settings, write_project_config, IdeSettings, ProjectIdentity};
use crate::console::OutputSink;
use crate::constants::{CONFIG_FILE, IDE_DIR, IDE_SETTINGS_FILE, README_FILE};
use crate::error::{Error, Result};
use crate::runner::CommandRunner;
use crate::template::{gdb_script_path, materialize, MaterializeOptions, TemplateSource};
use crate::vcs::{check_repository, run_git_init, write_ignore_file};

/// Everything `init` decided before touching the filesystem.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub sdk_root: PathBuf,
    pub output_dir: PathBuf,
    pub identity: ProjectIdentity,
    pub template: String,
    pub include_vscode: bool,
    pub include_readme: bool,
    pub init_git: bool,
    /// `output_dir` is the working directory the tool was started in
    pub adopt: bool,
}

/// Generates a project, rolling back a freshly created directory on failure.
pub fn generate_project<S: OutputSink>(options: &InitOptions, runner: &CommandRunner<S>) -> Result<()> {
    let created = !options.adopt && !options.output_dir.exists();

    let result = run_pipeline(options, runner);
    if result.is_err() && created && options.output_dir.exists() {
        debug!("Rolling back {}", options.output_dir.display());
        if let Err(e) = fs::remove_dir_all(&options.output_dir) {
            warn!("Failed to remove '{}': {}", options.output_dir.display(), e);
        }
    }
    result
}

fn run_pipeline<S: OutputSink>(options: &InitOptions, runner: &CommandRunner<S>) -> Result<()> {
    let source = TemplateSource::new(&options.sdk_root, &options.identity.target, &options.template);
    let template_dir = source.validate()?;
    debug!("Using {} at {}", source, template_dir.display());

    let config_path = options.output_dir.join(CONFIG_FILE);
    if config_path.exists() {
        return Err(Error::AlreadyInitialized { path: config_path });
    }

    // Nothing may be written before this check.
    let git = if options.init_git {
        Some(check_repository(&options.output_dir, options.adopt)?)
    } else {
        None
    };

    let settings_path = template_dir.join(IDE_DIR).join(IDE_SETTINGS_FILE);
    let settings = if settings_path.is_file() {
        read_ide_settings(&settings_path)?
    } else {
        debug!("Template has no IDE settings, using defaults");
        IdeSettings::new()
    };

    materialize(
        &template_dir,
        &options.output_dir,
        &options.identity,
        MaterializeOptions {
            include_vscode: options.include_vscode,
            with_git: options.init_git,
            adopt: options.adopt,
        },
    )?;

    if options.include_readme {
        let readme = options.output_dir.join(README_FILE);
        if options.adopt && readme.exists() {
            debug!("Keeping existing {}", readme.display());
        } else {
            fs::write(readme, format!("# {}\n", options.identity.name))?;
        }
    }

    let fields = derive_flash_fields(&settings, &options.identity.name);
    write_project_config(
        &options.output_dir,
        &options.identity,
        fields,
        &gdb_script_path(options.include_vscode),
    )?;

    if let Some(git) = git {
        run_git_init(&git, &options.output_dir, runner)?;
        // A generated .vscode carries the flash script and stays tracked.
        let ignore_ide_config = !options.include_vscode;
        write_ignore_file(&options.output_dir, ignore_ide_config)?;
    }

    Ok(())
}
