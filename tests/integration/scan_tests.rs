use dedupe::duplicates::{DedupeEngine, EngineConfig, RetentionReason};
use dedupe::scanner::{digest_bytes, Extension, ExtensionSet};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}

fn engine(extensions: &str, preferred: &str) -> DedupeEngine {
    DedupeEngine::new(
        EngineConfig::new(ExtensionSet::parse(extensions))
            .with_preferred(Extension::parse(preferred)),
    )
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.total_duplicate_bytes(), 0);
    assert_eq!(report.summary().files_cataloged, 0);
}

#[test]
fn test_scan_preferred_extension_is_kept() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.txt", b"X");
    let b = write(dir.path(), "b.txt", b"X");
    let c = write(dir.path(), "c.doc", b"X");

    let report = engine("txt,doc", "doc").run(dir.path()).unwrap();

    assert_eq!(report.sets().len(), 1);
    let set = &report.sets()[0];
    assert_eq!(set.retained, c);
    assert_eq!(set.reason, RetentionReason::PreferredExtension);
    assert_eq!(set.occurrences, 3);
    let duplicates: Vec<&Path> = set.paths().collect();
    assert_eq!(duplicates, vec![a.as_path(), b.as_path()]);
    assert_eq!(report.total_duplicate_bytes(), 2);
}

#[test]
fn test_scan_without_preference_keeps_one() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"X");
    write(dir.path(), "b.txt", b"X");
    write(dir.path(), "c.doc", b"X");

    let report = engine("txt,doc", "").run(dir.path()).unwrap();

    let set = &report.sets()[0];
    assert_eq!(set.duplicates.len(), 2);
    assert!(set.paths().all(|p| p != set.retained));
    assert_eq!(report.total_duplicate_bytes(), 2);
}

#[test]
fn test_scan_single_file_contributes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "y.txt", b"Y");

    let report = engine("txt", "doc").run(dir.path()).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.total_duplicate_bytes(), 0);
    assert_eq!(report.occurrences_of(&digest_bytes(b"Y")), 1);
}

#[test]
fn test_scan_distinct_content_never_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "c.txt", b"content c");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.summary().files_cataloged, 3);
    assert_eq!(report.summary().digest_groups, 3);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"nested duplicate");
    write(dir.path(), "one/two/three/b.txt", b"nested duplicate");
    write(dir.path(), "one/c.txt", b"nested duplicate");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert_eq!(report.sets().len(), 1);
    assert_eq!(report.sets()[0].occurrences, 3);
    assert_eq!(report.summary().duplicate_files, 2);
}

#[test]
fn test_scan_ignores_other_extensions() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.pdf", b"same");
    write(dir.path(), "c", b"same");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert!(report.is_empty());
    assert_eq!(report.summary().files_cataloged, 1);
}

#[test]
fn test_scan_extension_match_is_case_sensitive() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.TXT", b"same");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 1);
    assert!(report.is_empty());
}

#[test]
fn test_scan_uses_last_extension_only() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.tar.gz", b"archive");
    write(dir.path(), "b.gz", b"archive");
    write(dir.path(), "c.tar", b"archive");

    let report = engine("gz", "").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets()[0].occurrences, 2);
}

#[test]
fn test_scan_extension_list_is_normalized() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"same");
    write(dir.path(), "b.doc", b"same");

    let report = engine(" .txt , doc ,,", " .doc").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets()[0].retained, dir.path().join("b.doc"));
}

#[test]
fn test_scan_directories_named_like_files_are_descended() {
    let dir = tempdir().unwrap();
    write(dir.path(), "folder.txt/inner.txt", b"same");
    write(dir.path(), "outer.txt", b"same");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets().len(), 1);
}

#[test]
fn test_scan_byte_total_matches_sets() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", &[1u8; 100]);
    write(dir.path(), "b.txt", &[1u8; 100]);
    write(dir.path(), "c.txt", &[1u8; 100]);
    write(dir.path(), "d.txt", &[2u8; 40]);
    write(dir.path(), "e.txt", &[2u8; 40]);
    write(dir.path(), "f.txt", &[3u8; 7]);

    let report = engine("txt", "").run(dir.path()).unwrap();

    let summed: u64 = report.duplicates().map(|r| r.size).sum();
    assert_eq!(report.total_duplicate_bytes(), summed);
    assert_eq!(report.total_duplicate_bytes(), 2 * 100 + 40);
    for set in report.sets() {
        assert_eq!(set.duplicates.len(), set.occurrences - 1);
    }
}

#[test]
fn test_scan_is_idempotent() {
    let dir = tempdir().unwrap();
    write(dir.path(), "x1.txt", b"alpha");
    write(dir.path(), "x2.txt", b"alpha");
    write(dir.path(), "y1.txt", b"beta");
    write(dir.path(), "sub/y2.txt", b"beta");
    write(dir.path(), "sub/y3.txt", b"beta");

    let engine = engine("txt", "");
    let first = engine.run(dir.path()).unwrap();
    let second = engine.run(dir.path()).unwrap();

    assert_eq!(first.sets(), second.sets());
    assert_eq!(first.occurrences(), second.occurrences());
    assert_eq!(first.total_duplicate_bytes(), second.total_duplicate_bytes());
}

#[test]
fn test_scan_single_thread_matches_pool() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        write(dir.path(), &format!("f{i:02}.txt"), format!("{}", i % 4).as_bytes());
    }

    let single = DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")).with_io_threads(1))
        .run(dir.path())
        .unwrap();
    let pooled = DedupeEngine::new(EngineConfig::new(ExtensionSet::parse("txt")).with_io_threads(8))
        .run(dir.path())
        .unwrap();

    assert_eq!(single.sets(), pooled.sets());
    assert_eq!(single.sets().len(), 4);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"");
    write(dir.path(), "b.txt", b"");

    let report = engine("txt", "").run(dir.path()).unwrap();

    assert_eq!(report.sets().len(), 1);
    assert_eq!(report.total_duplicate_bytes(), 0);
}
