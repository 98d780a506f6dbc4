use dedupe::duplicates::{DedupeEngine, EngineConfig, EngineError};
use dedupe::error::{ExitCode, StructuredError};
use dedupe::scanner::{ExtensionSet, ScanError};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn engine() -> DedupeEngine {
    DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")))
}

#[test]
fn test_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    let result = engine().run(&missing);

    assert!(matches!(result, Err(EngineError::PathNotFound(p)) if p == missing));
}

#[test]
fn test_root_is_a_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"content").unwrap();

    let result = engine().run(&file);

    assert!(matches!(result, Err(EngineError::NotADirectory(_))));
}

#[test]
fn test_shutdown_before_run() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"X").unwrap();
    fs::write(dir.path().join("b.txt"), b"X").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let engine =
        DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")).with_shutdown_flag(flag));

    let err = anyhow::Error::new(engine.run(dir.path()).unwrap_err());
    assert_eq!(ExitCode::from_error(&err), ExitCode::Interrupted);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"X").unwrap();
    let locked = dir.path().join("b.txt");
    fs::write(&locked, b"X").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to check then.
    if fs::read(&locked).is_ok() {
        return;
    }

    let result = engine().run(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();

    assert!(matches!(
        result,
        Err(EngineError::Scan(ScanError::Hash(_)))
    ));
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_aborts_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"X").unwrap();
    fs::write(dir.path().join("b.txt"), b"X").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("c.txt"), b"X").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to check then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = engine().run(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(matches!(
        result,
        Err(EngineError::Scan(ScanError::PermissionDenied(p))) if p == locked
    ));
}

#[test]
fn test_structured_error_for_scan_failure() {
    let dir = tempdir().unwrap();
    let err = anyhow::Error::new(engine().run(&dir.path().join("nope")).unwrap_err())
        .context("failed to scan");

    let exit_code = ExitCode::from_error(&err);
    let structured = StructuredError::new(&err, exit_code);

    assert_eq!(structured.code, "DD001");
    assert_eq!(structured.exit_code, 1);
    assert!(!structured.interrupted);
    assert!(structured.message.contains("Path not found"));
}
