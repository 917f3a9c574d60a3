use std::io;
use std::path::PathBuf;

use msdk::error::Error;
use msdk::validation::PathType;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::NotFound {
        description: "template main.c".to_string(),
        path: PathBuf::from("/sdk/main.c"),
        hint: None,
    };
    assert_eq!(err.to_string(), "template main.c not found: '/sdk/main.c'");

    let err = Error::WrongType {
        description: "MAXIM_PATH".to_string(),
        path: PathBuf::from("/sdk"),
        expected: PathType::Dir,
        hint: None,
    };
    assert_eq!(err.to_string(), "MAXIM_PATH is not a directory: '/sdk'");

    let err = Error::CommandFailed { command: "make clean".to_string(), code: Some(3) };
    assert_eq!(err.to_string(), "command 'make clean' failed with exit code 3");

    let err = Error::CommandFailed { command: "make".to_string(), code: None };
    assert_eq!(err.to_string(), "command 'make' failed after being terminated by a signal");
}

#[test]
fn test_with_hint_appends() {
    let err = Error::NotFound {
        description: "board support package 'Evkit'".to_string(),
        path: PathBuf::from("/sdk/Libraries/Boards/MAX32655/Evkit"),
        hint: Some("did you mean 'EvKit_V1'?".to_string()),
    }
    .with_hint("available BSPs: EvKit_V1");
    assert_eq!(err.hint().unwrap(), "did you mean 'EvKit_V1'?\n  available BSPs: EvKit_V1");

    let err = Error::validation("project name cannot be empty").with_hint("pick a name");
    assert_eq!(err.hint().as_deref(), Some("pick a name"));
}

#[test]
fn test_exit_codes() {
    assert_eq!(Error::validation("bad input").exit_code(), 1);
    assert_eq!(Error::AlreadyInitialized { path: PathBuf::from("x") }.exit_code(), 1);

    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: Error = json_err.into();
    assert!(err.is_internal());
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_builtin_hints() {
    assert!(Error::AlreadyInitialized { path: PathBuf::from("x") }.hint().is_some());
    assert!(Error::InvalidName { name: "1abc".to_string(), kind: "directory" }.hint().is_some());
    assert!(Error::CommandFailed { command: "git".to_string(), code: Some(1) }.hint().is_none());
}

#[test]
fn test_parse_hint_asks_to_remove_broken_config_first() {
    let source = toml::from_str::<toml::Value>("[project").unwrap_err();
    let err = Error::Parse { path: PathBuf::from("msdk-proj.toml"), source };
    let hint = err.hint().unwrap();
    assert!(hint.contains("delete 'msdk-proj.toml'"));
    assert!(hint.find("delete").unwrap() < hint.find("msdk init").unwrap());
}
