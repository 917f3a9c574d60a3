//! Common constants used throughout the msdk application.

/// Environment variable pointing at the MaximSDK installation
pub const SDK_ENV_VAR: &str = "MAXIM_PATH";

/// Presence-only marker identifying a project root
pub const MARKER_FILE: &str = ".msdk-py-proj";

/// Persisted project configuration
pub const CONFIG_FILE: &str = "msdk-proj.toml";

pub const DEFAULT_BSP: &str = "EvKit_V1";
pub const DEFAULT_TEMPLATE: &str = "Hello_World";

/// Files every template must provide, paired with where they land in a project.
pub const TEMPLATE_FILES: [(&str, &str); 3] =
    [("Makefile", "Makefile"), ("main.c", "src/main.c"), ("project.mk", "project.mk")];

pub const BUILD_CONFIG_FILE: &str = "project.mk";
pub const IDE_DIR: &str = ".vscode";
pub const IDE_SETTINGS_FILE: &str = "settings.json";
pub const GDB_SCRIPT_FILE: &str = "flash.gdb";
pub const README_FILE: &str = "README.md";
pub const GIT_KEEP_FILE: &str = ".gitkeep";
pub const GIT_DIR: &str = ".git";
pub const GIT_IGNORE_FILE: &str = ".gitignore";

/// Build output directory produced by the SDK Makefiles
pub const BUILD_DIR: &str = "build";

/// Suffix used when moving an existing file aside
pub const BACKUP_SUFFIX: &str = "old";

pub const PROJECT_NAME_TOKEN: &str = "${config:project_name}";
pub const PROGRAM_FILE_TOKEN: &str = "${config:program_file}";
pub const DEFAULT_INTERFACE_FILE: &str = "cmsis-dap.cfg";

pub const GDB_BINARY: &str = "arm-none-eabi-gdb";

/// Patterns appended to `.gitignore` on init
pub const IGNORE_PATTERNS: [&str; 4] = ["build/", "compile_flags.txt", "*.log", "*.old"];
pub const IGNORE_HEADER: &str = "# msdk";

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERNAL: i32 = 2;
