use dedupe::duplicates::{DedupeEngine, EngineConfig};
use dedupe::scanner::ExtensionSet;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn engine(extensions: &str) -> DedupeEngine {
    DedupeEngine::new(EngineConfig::new(ExtensionSet::parse(extensions)))
}

#[test]
fn test_paths_with_quotes() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        File::create(dir.path().join("file_with_\"quote\".txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();
        File::create(dir.path().join("duplicate.txt"))
            .unwrap()
            .write_all(b"content")
            .unwrap();

        let report = engine("txt").run(dir.path()).unwrap();

        assert_eq!(report.sets().len(), 1);
        assert_eq!(report.sets()[0].occurrences, 2);
    }
}

#[test]
fn test_paths_with_newlines() {
    let dir = tempdir().unwrap();

    // Windows does not allow newlines in filenames.
    if cfg!(not(windows)) {
        fs::write(dir.path().join("file_with\nnewline.txt"), b"content").unwrap();
        fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

        let report = engine("txt").run(dir.path()).unwrap();

        assert_eq!(report.sets().len(), 1);
    }
}

#[test]
fn test_unicode_and_spaces() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("résumé final.doc"), b"cv").unwrap();
    fs::write(dir.path().join("日本語 ファイル.doc"), b"cv").unwrap();

    let report = engine("doc").run(dir.path()).unwrap();

    assert_eq!(report.sets().len(), 1);
    assert_eq!(report.total_duplicate_bytes(), 2);
}

#[test]
fn test_dotfile_name_is_its_own_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".txt"), b"hidden").unwrap();
    fs::write(dir.path().join("visible.txt"), b"hidden").unwrap();

    let report = engine("txt").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets().len(), 1);
}

#[test]
fn test_hidden_directories_are_scanned() {
    let dir = tempdir().unwrap();
    let hidden = dir.path().join(".cache");
    fs::create_dir(&hidden).unwrap();
    fs::write(hidden.join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let report = engine("txt").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets().len(), 1);
}

#[test]
fn test_file_without_extension_never_matches() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("README"), b"same").unwrap();
    fs::write(dir.path().join("Makefile"), b"same").unwrap();
    fs::write(dir.path().join("trailing."), b"same").unwrap();

    let report = engine("txt").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 0);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name_is_cataloged() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"X").unwrap();
    let raw = dir.path().join(OsStr::from_bytes(b"b\xff.txt"));

    // Some filesystems refuse names that are not valid UTF-8.
    if fs::write(&raw, b"X").is_err() {
        return;
    }

    let report = engine("txt").run(dir.path()).unwrap();

    assert_eq!(report.summary().files_cataloged, 2);
    assert_eq!(report.sets().len(), 1);
    assert_eq!(report.total_duplicate_bytes(), 1);
}
