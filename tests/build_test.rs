#![cfg(unix)]

mod common;

use std::fs;
use std::path::PathBuf;

use common::{identity, write_script, FakeSdk, RecordingSink};
use msdk::commands::build::{build_and_check_modified, build_project};
use msdk::commands::flash::flash_device;
use msdk::config::FlashConfig;
use msdk::console::Console;
use msdk::error::Error;
use msdk::runner::CommandRunner;
use tempfile::TempDir;

/// Installs a fake `make` into the SDK toolchain that logs its arguments and working directory.
fn fake_make(sdk: &FakeSdk, extra: &str) {
    write_script(
        &sdk.toolchain_bin().join("make"),
        &format!("echo \"$@\" > make.args\npwd > make.cwd\n{extra}"),
    );
}

fn runner() -> CommandRunner<RecordingSink> {
    CommandRunner::new(RecordingSink::default())
}

#[test]
fn test_build_runs_make_in_project() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "echo built");
    let project = TempDir::new().unwrap();
    let runner = runner();

    build_project(&runner, project.path(), sdk.root(), None).unwrap();

    let args = fs::read_to_string(project.path().join("make.args")).unwrap();
    assert_eq!(args.trim(), "-r -j 8 --output-sync=target --no-print-directory");
    let cwd = fs::read_to_string(project.path().join("make.cwd")).unwrap();
    assert_eq!(
        fs::canonicalize(cwd.trim()).unwrap(),
        fs::canonicalize(project.path()).unwrap()
    );
    assert_eq!(runner.sink().stdout_lines(), vec!["built"]);
}

#[test]
fn test_build_with_project_override() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();

    build_project(&runner(), project.path(), sdk.root(), Some("firmware")).unwrap();

    let args = fs::read_to_string(project.path().join("make.args")).unwrap();
    assert!(args.trim().ends_with("--no-print-directory PROJECT=firmware"));
}

#[test]
fn test_build_ignores_dot_override() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();

    build_project(&runner(), project.path(), sdk.root(), Some(".")).unwrap();

    let args = fs::read_to_string(project.path().join("make.args")).unwrap();
    assert!(!args.contains("PROJECT="));
}

#[test]
fn test_build_rejects_invalid_override() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();

    let err = build_project(&runner(), project.path(), sdk.root(), Some("9lives")).unwrap_err();

    assert!(matches!(err, Error::InvalidName { .. }));
    assert!(!project.path().join("make.args").exists());
}

#[test]
fn test_build_rejects_override_outside_project() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();

    let err = build_project(&runner(), project.path(), sdk.root(), Some("../evil")).unwrap_err();

    assert!(matches!(err, Error::InvalidName { ref name, .. } if name == "../evil"));
    assert!(!project.path().join("make.args").exists());
}

#[test]
fn test_build_failure_is_reported() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "echo 'main.c:1: error' >&2\nexit 2");
    let project = TempDir::new().unwrap();
    let runner = runner();

    let err = build_project(&runner, project.path(), sdk.root(), None).unwrap_err();

    assert!(matches!(err, Error::CommandFailed { code: Some(2), .. }));
    assert_eq!(runner.sink().stderr_lines(), vec!["main.c:1: error"]);
}

#[test]
fn test_build_detects_new_program_file() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "mkdir -p build\necho elf > build/blinky.elf");
    let project = TempDir::new().unwrap();
    let program = project.path().join("build/blinky.elf");

    assert!(build_and_check_modified(&runner(), project.path(), sdk.root(), &program).unwrap());
}

#[test]
fn test_build_without_output_is_not_a_change() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();
    let program = project.path().join("build/blinky.elf");

    assert!(!build_and_check_modified(&runner(), project.path(), sdk.root(), &program).unwrap());
}

#[test]
fn test_up_to_date_build_is_not_a_change() {
    let sdk = FakeSdk::new();
    fake_make(&sdk, "");
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join("build")).unwrap();
    let program = project.path().join("build/blinky.elf");
    fs::write(&program, "elf").unwrap();

    assert!(!build_and_check_modified(&runner(), project.path(), sdk.root(), &program).unwrap());
}

fn flash_config(project: &TempDir, ocd_path: PathBuf) -> FlashConfig {
    FlashConfig {
        identity: identity("blinky"),
        program_file: "blinky.elf".to_string(),
        symbol_file: "blinky.elf".to_string(),
        interface_file: "cmsis-dap.cfg".to_string(),
        target_file: "max32655.cfg".to_string(),
        gdb_script: project.path().join("flash.gdb"),
        ocd_path,
    }
}

#[test]
fn test_flash_invokes_debugger() {
    let sdk = FakeSdk::new();
    write_script(
        &sdk.toolchain_bin().join("arm-none-eabi-gdb"),
        "for arg in \"$@\"; do echo \"$arg\"; done > gdb.args",
    );
    let project = TempDir::new().unwrap();
    fs::create_dir(project.path().join("build")).unwrap();
    fs::write(project.path().join("build/blinky.elf"), "elf").unwrap();
    let ocd = sdk.root().join("Tools/OpenOCD");

    let config = flash_config(&project, ocd.clone());
    flash_device(&runner(), Console::new(true), project.path(), sdk.root(), &config, true).unwrap();

    let args = fs::read_to_string(project.path().join("gdb.args")).unwrap();
    let args: Vec<&str> = args.lines().collect();
    assert_eq!(args.len(), 6);
    assert_eq!(args[0], format!("--cd={}", project.path().display()));
    assert_eq!(args[1], format!("--se={}", project.path().join("build/blinky.elf").display()));
    assert_eq!(
        args[4],
        format!("--ex=flash_m4_run {} cmsis-dap.cfg max32655.cfg", ocd.display())
    );
    assert_eq!(args[5], "--batch");
}

#[test]
fn test_flash_requires_built_program() {
    let sdk = FakeSdk::new();
    let project = TempDir::new().unwrap();
    let config = flash_config(&project, sdk.root().join("Tools/OpenOCD"));

    let err = flash_device(&runner(), Console::new(true), project.path(), sdk.root(), &config, false)
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { ref path, .. } if path.ends_with("build/blinky.elf")));
    assert!(err.hint().unwrap().contains("msdk build"));
}
