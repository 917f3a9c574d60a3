#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use msdk::config::ProjectIdentity;
use msdk::console::OutputSink;
use msdk::generate::InitOptions;
use tempfile::TempDir;

pub const PROJECT_MK: &str = "# This file can be used to set build configuration\n\
# variables.\n\
\n\
# Add your config here!\n";

/// Matches the 4-space layout msdk writes, so an unchanged board round-trips byte for byte.
pub const SETTINGS_JSON: &str = r#"{
    "target": "MAX32655",
    "board": "EvKit_V1",
    "program_file": "${config:project_name}.elf",
    "symbol_file": "${config:program_file}",
    "M4_OCD_interface_file": "cmsis-dap.cfg",
    "M4_OCD_target_file": "max32655.cfg"
}"#;

/// A minimal MaximSDK installation in a temporary directory.
pub struct FakeSdk {
    pub dir: TempDir,
}

impl FakeSdk {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let template = root.join("Examples/MAX32655/Hello_World");
        fs::create_dir_all(template.join(".vscode")).unwrap();
        fs::write(template.join("Makefile"), "include $(MAXIM_PATH)/Libraries/CMSIS/Device/Maxim/MAX32655/Source/GCC/gcc.mk\n").unwrap();
        fs::write(template.join("main.c"), "int main(void) { return 0; }\n").unwrap();
        fs::write(template.join("project.mk"), PROJECT_MK).unwrap();
        fs::write(template.join(".vscode/settings.json"), SETTINGS_JSON).unwrap();
        fs::write(template.join(".vscode/flash.gdb"), "define flash_m4\nend\n").unwrap();
        fs::write(template.join(".vscode/launch.json"), "{}\n").unwrap();

        fs::create_dir_all(root.join("Examples/MAX32655/GPIO")).unwrap();
        fs::create_dir_all(root.join("Examples/MAX32690")).unwrap();
        fs::create_dir_all(root.join("Libraries/Boards/MAX32655/EvKit_V1")).unwrap();
        fs::create_dir_all(root.join("Libraries/Boards/MAX32655/FTHR_Apps_P1")).unwrap();
        fs::create_dir_all(root.join("Tools/GNUTools/10.3/bin")).unwrap();
        fs::create_dir_all(root.join("Tools/OpenOCD")).unwrap();

        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn template_dir(&self) -> PathBuf {
        self.root().join("Examples/MAX32655/Hello_World")
    }

    pub fn toolchain_bin(&self) -> PathBuf {
        self.root().join("Tools/GNUTools/10.3/bin")
    }
}

pub fn identity(name: &str) -> ProjectIdentity {
    ProjectIdentity {
        name: name.to_string(),
        target: "MAX32655".to_string(),
        board: "EvKit_V1".to_string(),
    }
}

pub fn init_options(sdk: &FakeSdk, output_dir: PathBuf) -> InitOptions {
    let name = output_dir.file_name().unwrap().to_string_lossy().into_owned();
    InitOptions {
        sdk_root: sdk.root().to_path_buf(),
        output_dir,
        identity: identity(&name),
        template: "Hello_World".to_string(),
        include_vscode: true,
        include_readme: true,
        init_git: false,
        adopt: false,
    }
}

/// Collects command output instead of printing it.
#[derive(Default)]
pub struct RecordingSink {
    pub stdout: Mutex<Vec<String>>,
    pub stderr: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout.lock().unwrap().clone()
    }

    pub fn stderr_lines(&self) -> Vec<String> {
        self.stderr.lock().unwrap().clone()
    }
}

impl OutputSink for RecordingSink {
    fn stdout_line(&self, line: &str) {
        self.stdout.lock().unwrap().push(line.to_string());
    }

    fn stderr_line(&self, line: &str) {
        self.stderr.lock().unwrap().push(line.to_string());
    }
}

/// Writes an executable shell script.
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
