//! `msdk init` -- create a project from an SDK example.

use std::env;
use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Args};
use colored::Colorize;

use crate::commands::Context;
use crate::config::ProjectIdentity;
use crate::constants::{DEFAULT_BSP, DEFAULT_TEMPLATE};
use crate::environment::resolve_sdk_root;
use crate::error::{Error, Result};
use crate::generate::{generate_project, InitOptions};
use crate::validation::{normalize_target, validate_bsp, validate_project_name, validate_target};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Name (or path) of the project to create; "." for the current directory
    #[arg(value_name = "PROJECT")]
    pub project_name: PathBuf,

    /// Target device (MAX32655, MAX32690, ...)
    #[arg(short, long, value_name = "TGT")]
    pub target: String,

    /// Board support package
    #[arg(short, long, value_name = "BSP", default_value = DEFAULT_BSP)]
    pub bsp: String,

    /// Template (example) name from the SDK (e.g. Hello_World, GPIO, I2C)
    #[arg(long, value_name = "TEM", default_value = DEFAULT_TEMPLATE)]
    pub template: String,

    /// Don't include VSCode configuration
    #[arg(long = "no-vscode", action = ArgAction::SetFalse)]
    pub include_vscode: bool,

    /// Don't create README.md
    #[arg(long = "no-readme", action = ArgAction::SetFalse)]
    pub include_readme: bool,

    /// Don't initialize a git repository
    #[arg(long = "no-git", action = ArgAction::SetFalse)]
    pub init_git: bool,

    /// Allow initializing (or reinitializing) the current directory
    #[arg(long)]
    pub allow_cwd: bool,
}

pub fn execute(args: InitArgs, context: &Context) -> Result<()> {
    let target = normalize_target(&args.target);

    let sdk_root = resolve_sdk_root()?;
    validate_target(&target, &sdk_root)?;
    validate_bsp(&target, &args.bsp, &sdk_root)?;

    let output_dir = resolve_output_dir(&args.project_name, &context.cwd);
    let adopt = output_dir == context.cwd;
    if adopt && !args.allow_cwd {
        return Err(Error::Validation {
            message: format!(
                "refusing to initialize the current directory: '{}'",
                output_dir.display()
            ),
            hint: Some("pass --allow-cwd to turn the current directory into a project".to_string()),
        });
    }

    let name = output_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            Error::validation(format!("cannot derive a project name from '{}'", output_dir.display()))
        })?
        .to_string();
    let parent = output_dir.parent().unwrap_or(&output_dir);
    validate_project_name(&name, parent)?;

    let options = InitOptions {
        sdk_root,
        output_dir: output_dir.clone(),
        identity: ProjectIdentity { name: name.clone(), target, board: args.bsp },
        template: args.template,
        include_vscode: args.include_vscode,
        include_readme: args.include_readme,
        init_git: args.init_git,
        adopt,
    };
    generate_project(&options, &context.runner)?;

    context.console.success(format!(
        "Initialized project {} at {}",
        name.cyan().bold(),
        output_dir.display().to_string().cyan()
    ));
    Ok(())
}

/// Turns the user's project argument into an absolute, lexically normalized path.
///
/// A leading `~` expands to `$HOME`; relative paths are taken from `cwd`.
pub fn resolve_output_dir(project: &Path, cwd: &Path) -> PathBuf {
    let expanded = match (project.strip_prefix("~"), env::var_os("HOME")) {
        (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => project.to_path_buf(),
    };
    let joined = if expanded.is_absolute() { expanded } else { cwd.join(expanded) };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_resolves_to_cwd() {
        let cwd = Path::new("/home/user/work");
        assert_eq!(resolve_output_dir(Path::new("."), cwd), cwd);
    }

    #[test]
    fn test_relative_and_parent_components() {
        let cwd = Path::new("/home/user/work");
        assert_eq!(resolve_output_dir(Path::new("blinky"), cwd), Path::new("/home/user/work/blinky"));
        assert_eq!(
            resolve_output_dir(Path::new("../other/./blinky"), cwd),
            Path::new("/home/user/other/blinky")
        );
    }

    #[test]
    fn test_absolute_path_ignores_cwd() {
        let cwd = Path::new("/home/user/work");
        assert_eq!(resolve_output_dir(Path::new("/tmp/blinky"), cwd), Path::new("/tmp/blinky"));
    }
}
