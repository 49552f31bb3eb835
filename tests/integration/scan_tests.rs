use dupsweep::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupsweep::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn all_files() -> FinderConfig {
    FinderConfig::default().with_walker_config(WalkerConfig::default().with_extension_list(""))
}

fn write(path: &Path, content: &[u8]) {
    File::create(path).unwrap().write_all(content).unwrap();
}

fn members(report: &dupsweep::duplicates::ScanReport) -> Vec<Vec<PathBuf>> {
    report
        .duplicate_groups()
        .map(|g| g.members().to_vec())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let report = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(report.duplicate_groups().count(), 0);
    assert_eq!(report.totals.files_seen, 0);
    assert_eq!(
        report.totals.summary_line(report.elapsed),
        format!(
            "Finish, 0 group files has 0 copies, 0 will be deleted, time consuming: {:?}.",
            report.elapsed
        )
    );
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"content a");
    write(&dir.path().join("b.txt"), b"content bb");
    write(&dir.path().join("c.txt"), b"content ccc");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(report.totals.files_seen, 3);
    assert_eq!(report.totals.same_size_candidates, 0);
    assert_eq!(report.duplicate_groups().count(), 0);
}

#[test]
fn test_scan_two_groups_across_directories() {
    let dir = tempdir().unwrap();
    let x = dir.path().join("x");
    let y = dir.path().join("y");
    fs::create_dir_all(&x).unwrap();
    fs::create_dir_all(&y).unwrap();

    write(&x.join("a.txt"), b"same");
    write(&y.join("a.txt"), b"same");
    write(&y.join("b.txt"), b"diff");
    write(&x.join("c.jpg"), b"photo bytes");
    write(&y.join("c.jpg"), b"photo bytes");

    let root = dir.path().canonicalize().unwrap();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[root.clone()])
        .unwrap();

    assert_eq!(
        members(&report),
        vec![
            vec![root.join("x/a.txt"), root.join("y/a.txt")],
            vec![root.join("x/c.jpg"), root.join("y/c.jpg")],
        ]
    );
    assert_eq!(report.totals.duplicate_groups, 2);
    assert_eq!(report.totals.duplicate_files, 4);
    assert_eq!(report.totals.redundant(), 2);
}

#[test]
fn test_scan_default_extensions_filter() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"same");
    write(&dir.path().join("b.txt"), b"same");
    write(&dir.path().join("a.xyz"), b"same");
    write(&dir.path().join("b.xyz"), b"same");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(report.totals.files_seen, 2);
    assert_eq!(report.totals.duplicate_files, 2);

    let report = DuplicateFinder::new(all_files())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(report.totals.files_seen, 4);
    assert_eq!(report.totals.duplicate_files, 4);
    assert_eq!(report.totals.duplicate_groups, 1);
}

#[test]
fn test_scan_extension_matches_bare_suffix() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("photojpg"), b"same bytes");
    write(&dir.path().join("backupjpg"), b"same bytes");
    write(&dir.path().join("notes.txt"), b"same bytes");

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(WalkerConfig::default().with_extension_list("jpg")),
    );
    let report = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(report.totals.files_seen, 2);
    assert_eq!(report.totals.duplicate_groups, 1);
    let group = report.duplicate_groups().next().unwrap();
    assert!(group.canonical().ends_with("backupjpg"));
}

#[cfg(unix)]
#[test]
fn test_scan_followed_link_not_grouped_with_target() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("z_real.txt");
    write(&real, b"only copy");
    std::os::unix::fs::symlink(&real, dir.path().join("a_link.txt")).unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(
            WalkerConfig::default()
                .with_extension_list("")
                .with_follow_symlinks(true),
        ),
    );
    let report = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(report.duplicate_groups().count(), 0);
    assert_eq!(report.totals.redundant(), 0);
}

#[test]
fn test_scan_empty_allow_list_with_nested_files() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("one/two/three");
    fs::create_dir_all(&nested).unwrap();
    write(&nested.join("README"), b"no extension");
    write(&dir.path().join("LICENSE"), b"no extension");

    let report = DuplicateFinder::new(all_files())
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(report.totals.duplicate_groups, 1);
    let group = report.duplicate_groups().next().unwrap();
    assert!(group.canonical().ends_with("LICENSE"));
}

#[test]
fn test_scan_zero_length_files_never_grouped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"");
    write(&dir.path().join("b.txt"), b"");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(report.totals.files_seen, 2);
    assert_eq!(report.totals.same_size_candidates, 0);
    assert_eq!(report.duplicate_groups().count(), 0);
}

#[test]
fn test_scan_excludes_hidden_and_nas_folders() {
    let dir = tempdir().unwrap();
    for sub in [".git", "@__thumb", "share/@Recycle", "share/@Recently-Snapshot"] {
        let path = dir.path().join(sub);
        fs::create_dir_all(&path).unwrap();
        write(&path.join("copy.txt"), b"payload");
    }
    write(&dir.path().join("original.txt"), b"payload");
    write(&dir.path().join(".hidden.txt"), b"payload");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(report.totals.files_seen, 1);
    assert_eq!(report.duplicate_groups().count(), 0);
}

#[test]
fn test_scan_multiple_roots() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("one.txt"), b"shared");
    write(&b.path().join("two.txt"), b"shared");

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[a.path().to_path_buf(), b.path().to_path_buf()])
        .unwrap();

    assert_eq!(report.totals.files_seen, 2);
    assert_eq!(report.totals.duplicate_groups, 1);
}

#[test]
fn test_scan_same_root_twice() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"dup");
    write(&dir.path().join("b.txt"), b"dup");

    let root = dir.path().to_path_buf();
    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[root.clone(), root])
        .unwrap();

    assert_eq!(report.totals.files_seen, 2);
    assert_eq!(members(&report)[0].len(), 2);
}

#[test]
fn test_scan_disable_partial_hash_same_result() {
    let dir = tempdir().unwrap();
    let mut big = vec![0u8; 10_000];
    write(&dir.path().join("a.dat"), &big);
    write(&dir.path().join("b.dat"), &big);
    big[9_999] = 1;
    write(&dir.path().join("c.dat"), &big);

    let with = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();
    let without = DuplicateFinder::new(FinderConfig::default().with_partial_hash(false))
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(members(&with), members(&without));
    assert_eq!(with.totals.duplicate_files, 2);
}

#[test]
fn test_scan_is_repeatable() {
    let dir = tempdir().unwrap();
    for name in ["d.txt", "b.txt", "c.txt", "a.txt"] {
        write(&dir.path().join(name), b"same bytes");
    }

    let finder = DuplicateFinder::with_defaults();
    let first = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();
    let second = finder.find_duplicates(&[dir.path().to_path_buf()]).unwrap();

    assert_eq!(members(&first), members(&second));
    assert_eq!(first.totals, second.totals);
    let group = first.duplicate_groups().next().unwrap();
    assert!(group.canonical().ends_with("a.txt"));
}

#[test]
fn test_scan_missing_root_is_fatal() {
    let result = DuplicateFinder::with_defaults()
        .find_duplicates(&[PathBuf::from("/nonexistent/dupsweep/root")]);
    assert!(matches!(result, Err(FinderError::PathNotFound(_))));
}

#[cfg(unix)]
#[test]
fn test_scan_unreadable_subdirectory_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write(&locked.join("inner.txt"), b"dup");
    write(&dir.path().join("a.txt"), b"dup");
    write(&dir.path().join("b.txt"), b"dup");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root can read anything; nothing to observe in that case.
    let readable = fs::read_dir(&locked).is_ok();

    let report = DuplicateFinder::with_defaults()
        .find_duplicates(&[dir.path().to_path_buf()])
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    if !readable {
        assert_eq!(report.scan_errors.len(), 1);
        assert_eq!(report.totals.duplicate_files, 2);
    }
}
