use std::fs;
use std::path::Path;

use chart_golden::compare::{compare_trees, CompareOptions};
use chart_golden::regenerate::{copy_file, regenerate};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_regenerate_overwrites_expected_tree() {
    let temp_dir = TempDir::new().unwrap();
    let actual = temp_dir.path().join("actual");
    let expected = temp_dir.path().join("expected");
    write(&actual, "v1/Service/web.yaml", "kind: Service\n");
    write(&actual, "apps/v1/Deployment/web.yaml", "kind: Deployment\nreplicas: 2\n");
    write(&expected, "apps/v1/Deployment/web.yaml", "kind: Deployment\nreplicas: 1\n");

    let count = regenerate(&actual, &expected).unwrap();

    assert_eq!(count, 2);
    assert!(!dir_diff::is_different(&actual, &expected).unwrap());
    let comparison = compare_trees(&expected, &actual, CompareOptions::default()).unwrap();
    assert!(comparison.is_success(false));
}

#[test]
fn test_regenerate_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let actual = temp_dir.path().join("actual");
    let expected = temp_dir.path().join("expected");
    let snapshot = temp_dir.path().join("snapshot");
    write(&actual, "X/foo.yaml", "foo\n");
    write(&actual, "X/bar.yaml", "bar\n");

    regenerate(&actual, &expected).unwrap();
    regenerate(&expected, &snapshot).unwrap();
    let count = regenerate(&actual, &expected).unwrap();

    assert_eq!(count, 2);
    assert!(!dir_diff::is_different(&expected, &snapshot).unwrap());
}

#[test]
fn test_regenerate_only_copies_yaml_files() {
    let temp_dir = TempDir::new().unwrap();
    let actual = temp_dir.path().join("actual");
    let expected = temp_dir.path().join("expected");
    write(&actual, "X/foo.yaml", "foo\n");
    write(&actual, "NOTES.txt", "notes\n");

    assert_eq!(regenerate(&actual, &expected).unwrap(), 1);
    assert!(expected.join("X/foo.yaml").exists());
    assert!(!expected.join("NOTES.txt").exists());
}

#[cfg(unix)]
#[test]
fn test_copy_file_keeps_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source.yaml");
    fs::write(&source, "a: 1\n").unwrap();
    fs::set_permissions(&source, fs::Permissions::from_mode(0o640)).unwrap();

    let dest = temp_dir.path().join("nested/dir/dest.yaml");
    copy_file(&source, &dest).unwrap();

    assert_eq!(fs::read_to_string(&dest).unwrap(), "a: 1\n");
    assert_eq!(fs::metadata(&dest).unwrap().permissions().mode() & 0o777, 0o640);
}
