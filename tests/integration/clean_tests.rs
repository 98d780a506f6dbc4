use clap::Parser;
use dedupe::actions::{DeleteConfig, DeleteError, Remover};
use dedupe::app::run_with_output;
use dedupe::cli::Cli;
use dedupe::duplicates::{DedupeEngine, EngineConfig};
use dedupe::error::ExitCode;
use dedupe::scanner::{Extension, ExtensionSet};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Run the binary logic with an empty config file and no countdown.
fn run(root: &Path, extra: &[&str]) -> (ExitCode, String) {
    let config_dir = TempDir::new().unwrap();
    let config = write(config_dir.path(), "config.toml", b"");

    let mut args: Vec<String> = vec![
        "dedupe".into(),
        "--directory".into(),
        root.display().to_string(),
        "--config".into(),
        config.display().to_string(),
        "--delay".into(),
        "0".into(),
        "--no-progress".into(),
        "--quiet".into(),
    ];
    args.extend(extra.iter().map(|s| (*s).to_string()));

    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    let code = run_with_output(cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_clean_deletes_duplicates_and_keeps_preferred() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");
    let c = write(dir.path(), "c.doc", b"X");
    let y = write(dir.path(), "y.txt", b"Y");

    let (code, out) = run(
        dir.path(),
        &["--extensions", "txt,doc", "--preferred", "doc", "--clean"],
    );

    assert_eq!(code, ExitCode::Success);
    assert!(!a.exists());
    assert!(!b.exists());
    assert!(c.exists());
    assert!(y.exists());

    assert!(out.contains(&format!("deleted:  {}", a.display())));
    assert!(out.contains(&format!("deleted:  {}", b.display())));
    assert!(!out.contains(&format!("deleted:  {}", c.display())));
    assert!(out.ends_with("total duplicate bytes:  2\n"));
}

#[test]
fn test_listing_mode_touches_nothing() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");

    let (_, out) = run(dir.path(), &["--extensions", "txt"]);

    assert!(a.exists());
    assert!(b.exists());
    assert!(!out.contains("deleted:"));
    assert!(out.contains(&b.display().to_string()));
    assert!(out.ends_with("total duplicate bytes:  1\n"));
}

#[test]
fn test_clean_json_marks_deleted() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same content");
    write(dir.path(), "b.txt", b"same content");
    let kept = write(dir.path(), "c.doc", b"same content");

    let (_, out) = run(
        dir.path(),
        &[
            "--extensions",
            "txt,doc",
            "--preferred",
            "doc",
            "--clean",
            "--output",
            "json",
        ],
    );

    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let set = &parsed["sets"][0];
    assert_eq!(set["retained"], kept.display().to_string());
    assert_eq!(set["duplicates"].as_array().unwrap().len(), 2);
    assert!(set["duplicates"]
        .as_array()
        .unwrap()
        .iter()
        .all(|d| d["action"] == "deleted"));
    assert_eq!(parsed["total_duplicate_bytes"], 24);

    let remaining: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(remaining.len(), 1);
}

#[test]
fn test_clean_leaves_exactly_one_copy_per_set() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write(dir.path(), &format!("alpha{i}.txt"), b"alpha");
        write(dir.path(), &format!("beta{i}.txt"), b"beta");
    }
    write(dir.path(), "gamma.txt", b"gamma");

    run(dir.path(), &["--extensions", "txt", "--clean"]);

    let mut contents: Vec<Vec<u8>> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| fs::read(e.unwrap().path()).unwrap())
        .collect();
    contents.sort();
    assert_eq!(
        contents,
        vec![b"alpha".to_vec(), b"beta".to_vec(), b"gamma".to_vec()]
    );
}

#[test]
fn test_clean_only_touches_selected_extensions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"X");
    write(dir.path(), "b.txt", b"X");
    let pdf = write(dir.path(), "c.pdf", b"X");

    run(dir.path(), &["--extensions", "txt", "--clean"]);

    assert!(pdf.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_remover_fails_fast_on_vanished_duplicate() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");
    let c = write(dir.path(), "c.txt", b"X");

    let report = DedupeEngine::new(
        EngineConfig::new(ExtensionSet::parse("txt")).with_preferred(Extension::parse("")),
    )
    .run(dir.path())
    .unwrap();
    fs::remove_file(&b).unwrap();

    let mut remover = Remover::new(DeleteConfig::permanent());
    let result = remover.remove_set(&report.sets()[0]);

    assert!(matches!(result, Err(DeleteError::NotFound(p)) if p == b));
    assert!(c.exists());
    assert_eq!(remover.result().success_count(), 0);
}

#[test]
fn test_remover_refuses_modified_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");

    let report = DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")))
        .run(dir.path())
        .unwrap();
    fs::write(&b, b"changed after the scan").unwrap();

    let mut remover = Remover::new(DeleteConfig::permanent());
    let result = remover.remove_set(&report.sets()[0]);

    assert!(matches!(result, Err(DeleteError::Modified(_))));
    assert!(b.exists());
}
