use super::*;
use crate::kernel::ignore::base_ignore_block;
use crate::kernel::services::adapters::file::LocalFileSystem;
use crate::test_support::{block_on, MemoryFs};

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

fn seed() -> Vec<String> {
    vec![base_ignore_block()]
}

#[test]
fn caller_rules_and_base_list_filter_files() {
    let fs = MemoryFs::new();
    fs.add_file("/p/a.log", "");
    fs.add_file("/p/b.txt", "");
    fs.add_file("/p/node_modules/x.txt", "");
    let root = Path::new("/p");

    let out = block_on(scan(
        &fs,
        root,
        root,
        &["*.log".to_string()],
        &ScanOptions::default(),
    ))
    .unwrap();

    assert_eq!(out.files, paths(&["b.txt"]));
    assert!(out.warnings.is_empty());
}

#[test]
fn root_gitignore_excludes_directory_subtree() {
    let fs = MemoryFs::new();
    fs.add_file("/p/.gitignore", "build/\n");
    fs.add_file("/p/build/out.js", "");
    fs.add_file("/p/build/nested/deep.js", "");
    fs.add_file("/p/src/main.ts", "");
    fs.add_file("/p/src/lib/util.ts", "");
    let root = Path::new("/p");

    let out = block_on(scan(&fs, root, root, &[], &ScanOptions::default())).unwrap();

    assert_eq!(
        sorted(out.files),
        paths(&[".gitignore", "src/lib/util.ts", "src/main.ts"])
    );
    assert_eq!(sorted(out.dirs), paths(&["src", "src/lib"]));
}

#[test]
fn nested_negation_reincludes_only_in_its_subtree() {
    let fs = MemoryFs::new();
    fs.add_file("/p/.gitignore", "*.gen.ts\n");
    fs.add_file("/p/keep/.gitignore", "!*.gen.ts\n");
    fs.add_file("/p/keep/a.gen.ts", "");
    fs.add_file("/p/other/b.gen.ts", "");
    fs.add_file("/p/other/c.ts", "");
    let root = Path::new("/p");

    let out = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap();

    let files = sorted(out.files);
    assert!(files.contains(&PathBuf::from("keep/a.gen.ts")));
    assert!(!files.contains(&PathBuf::from("other/b.gen.ts")));
    assert!(files.contains(&PathBuf::from("other/c.ts")));
}

#[test]
fn sibling_subtrees_do_not_share_rules() {
    let fs = MemoryFs::new();
    fs.add_file("/p/a/.gitignore", "secret.txt\n");
    fs.add_file("/p/a/secret.txt", "");
    fs.add_file("/p/b/secret.txt", "");
    let root = Path::new("/p");

    let out = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap();

    let files = sorted(out.files);
    assert!(!files.contains(&PathBuf::from("a/secret.txt")));
    assert!(files.contains(&PathBuf::from("b/secret.txt")));
}

#[test]
fn base_listed_directories_are_not_descended() {
    let fs = MemoryFs::new();
    fs.add_file("/p/target/debug/app", "");
    fs.add_file("/p/.git/HEAD", "");
    fs.add_file("/p/Cargo.lock", "");
    fs.add_file("/p/Cargo.toml", "");
    let root = Path::new("/p");

    let out = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap();

    assert_eq!(out.files, paths(&["Cargo.toml"]));
    assert!(out.dirs.is_empty());
}

#[test]
fn unreadable_subdirectory_aborts_by_default() {
    let fs = MemoryFs::new();
    fs.add_file("/p/ok/a.txt", "");
    fs.add_file("/p/locked/b.txt", "");
    fs.fail_read_dir("/p/locked");
    let root = Path::new("/p");

    let err = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap_err();

    assert!(matches!(err, ScanError::ReadDir { .. }));
    assert_eq!(err.path(), Some(Path::new("/p/locked")));
}

#[test]
fn skip_policy_drops_failing_subtree_with_warning() {
    let fs = MemoryFs::new();
    fs.add_file("/p/ok/a.txt", "");
    fs.add_file("/p/locked/b.txt", "");
    fs.add_file("/p/bad_rules/.gitignore", "");
    fs.add_file("/p/bad_rules/c.txt", "");
    fs.fail_read_dir("/p/locked");
    fs.fail_read_file("/p/bad_rules/.gitignore");
    let root = Path::new("/p");
    let options = ScanOptions {
        failure_policy: ScanFailurePolicy::SkipWithWarning,
    };

    let out = block_on(scan(&fs, root, root, &seed(), &options)).unwrap();

    assert_eq!(out.files, paths(&["ok/a.txt"]));
    let mut warned: Vec<_> = out.warnings.iter().map(|w| w.path.clone()).collect();
    warned.sort();
    assert_eq!(
        warned,
        paths(&["/p/bad_rules/.gitignore", "/p/locked"])
    );
}

#[test]
fn unreadable_root_is_an_error_under_any_policy() {
    let fs = MemoryFs::new();
    fs.add_dir("/p");
    fs.fail_read_dir("/p");
    let root = Path::new("/p");
    let options = ScanOptions {
        failure_policy: ScanFailurePolicy::SkipWithWarning,
    };

    assert!(block_on(scan(&fs, root, root, &seed(), &options)).is_err());
}

#[test]
fn scans_a_real_directory_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    std::fs::write(root.join(".gitignore"), "*.tmp\n").unwrap();
    std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
    std::fs::write(root.join("src/scratch.tmp"), "").unwrap();
    std::fs::write(root.join("node_modules/pkg/index.js"), "").unwrap();

    let fs = LocalFileSystem::new();
    let out = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap();

    assert_eq!(
        sorted(out.files),
        paths(&[".gitignore", "src/main.rs"])
    );
    assert_eq!(out.dirs, paths(&["src"]));
}

#[cfg(unix)]
#[test]
fn directory_link_back_to_root_is_not_walked() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("src")).unwrap();
    std::fs::write(root.join("src/main.rs"), "fn main() {}").unwrap();
    std::os::unix::fs::symlink(root, root.join("src/loop")).unwrap();

    let fs = LocalFileSystem::new();
    let out = block_on(scan(&fs, root, root, &seed(), &ScanOptions::default())).unwrap();

    assert_eq!(sorted(out.files), paths(&["src/loop", "src/main.rs"]));
    assert_eq!(out.dirs, paths(&["src"]));
}
