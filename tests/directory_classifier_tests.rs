use rfid_catalog::scanner::{ArtifactKind, ArtifactLocator, DirectoryClassifier, MatchPolicy};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn make_tag(root: &Path, rel: &str, files: &[&str]) {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), b"").unwrap();
    }
}

fn found_uids(classifier: &DirectoryClassifier, root: &Path) -> BTreeSet<String> {
    classifier
        .scan(root)
        .unwrap()
        .into_iter()
        .map(|d| d.uid_name)
        .collect()
}

#[test]
fn test_finds_tag_directories_at_any_depth() {
    let temp = TempDir::new().unwrap();
    make_tag(temp.path(), "PLA/PLA Basic/Black/0A1B2C3D", &["hf-mf-0A1B2C3D-dump.bin"]);
    make_tag(temp.path(), "PETG/PETG HF/Red/deadbeef", &["dump.json"]);
    make_tag(temp.path(), "TPU/AABBCCDD", &[]);
    make_tag(temp.path(), "ABS/ABS/White/not-a-uid", &["dump.bin"]);
    make_tag(temp.path(), "ABS/ABS/White/0A1B2C3D4", &["dump.bin"]);

    let uids = found_uids(&DirectoryClassifier::new(), temp.path());
    let expected: BTreeSet<String> = ["0A1B2C3D", "deadbeef", "AABBCCDD"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(uids, expected);
}

#[test]
fn test_excluded_subtree_is_pruned() {
    let temp = TempDir::new().unwrap();
    make_tag(temp.path(), "scripts/fixtures/11223344", &["dump.json"]);
    make_tag(temp.path(), "scripts/55667788", &["dump.json"]);
    make_tag(temp.path(), "PLA/PLA Matte/White/99AABBCC", &["dump.json"]);

    let uids = found_uids(&DirectoryClassifier::new(), temp.path());
    assert_eq!(uids.len(), 1);
    assert!(uids.contains("99AABBCC"));
}

#[test]
fn test_custom_exclusions() {
    let temp = TempDir::new().unwrap();
    make_tag(temp.path(), "tools/11223344", &[]);
    make_tag(temp.path(), "scripts/55667788", &[]);

    let classifier = DirectoryClassifier::with_excluded(["tools"]);
    let uids = found_uids(&classifier, temp.path());
    assert!(uids.contains("55667788"));
    assert!(!uids.contains("11223344"));
}

#[test]
fn test_root_is_never_classified() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("CAFEBABE");
    make_tag(&root, "PLA/PLA Basic/Black/0A1B2C3D", &[]);

    let uids = found_uids(&DirectoryClassifier::new(), &root);
    assert_eq!(uids.len(), 1);
    assert!(uids.contains("0A1B2C3D"));
}

#[test]
fn test_tag_directory_contents() {
    let temp = TempDir::new().unwrap();
    make_tag(
        temp.path(),
        "PLA/PLA Basic/Black/0A1B2C3D",
        &["hf-mf-0A1B2C3D-dump.bin", "hf-mf-0A1B2C3D-dump.json"],
    );
    fs::create_dir(temp.path().join("PLA/PLA Basic/Black/0A1B2C3D/sub")).unwrap();

    let dirs = DirectoryClassifier::new().scan(temp.path()).unwrap();
    assert_eq!(dirs.len(), 1);
    let dir = &dirs[0];
    assert_eq!(dir.segments, vec!["PLA", "PLA Basic", "Black", "0A1B2C3D"]);
    assert_eq!(dir.files.len(), 2);

    let artifacts = ArtifactLocator::default().locate(dir).unwrap();
    assert_eq!(artifacts.kinds(), vec![ArtifactKind::RawDump, ArtifactKind::KeyDump]);
    assert!(artifacts.needs_key_synthesis());
}

#[test]
fn test_strict_locator_over_real_directory() {
    let temp = TempDir::new().unwrap();
    make_tag(temp.path(), "PLA/x/y/0A1B2C3D", &["a-dump.json", "b-dump.json"]);

    let dirs = DirectoryClassifier::new().scan(temp.path()).unwrap();
    assert!(ArtifactLocator::new(MatchPolicy::FirstWins).locate(&dirs[0]).is_ok());
    assert!(ArtifactLocator::new(MatchPolicy::Strict).locate(&dirs[0]).is_err());
}

#[test]
fn test_missing_root_fails_strict_scan() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope");

    assert!(DirectoryClassifier::new().scan(&missing).is_err());
    assert!(DirectoryClassifier::new().scan_lenient(&missing).is_empty());
}
