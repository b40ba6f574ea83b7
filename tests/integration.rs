// Integration testing can be done either by calling library functions directly or by invoking your CLI as a subprocess.
use predicates::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn tmptree() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("tmptree").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn preview_fixture() {
    tmptree()
        .arg("preview")
        .arg(fixture("basic.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("basic"))
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("baz.txt"))
        .stdout(predicate::str::contains("b.txt"))
        .stdout(predicate::str::contains("foo-copy <- "));
}

#[test]
fn apply_fixture_keeps_directory() {
    let output = tmptree()
        .arg("apply")
        .arg(fixture("basic.toml"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let root = PathBuf::from(stdout.lines().last().unwrap().trim());

    let get = |path: PathBuf| fs::read_to_string(path).unwrap();
    assert_eq!(get(root.join("a.txt")), "hi");
    assert_eq!(get(root.join("foo").join("bar").join("baz.txt")), "hello");
    assert_eq!(get(root.join("fiz").join("buz").join("biz.txt")), "hello");
    assert_eq!(get(root.join("sub").join("b.txt")), "yo");
    assert!(root.join("empty").is_dir());
    assert_eq!(get(root.join("foo-copy").join("abc").join("def.txt")), "abcdef\n");
    assert_eq!(get(root.join("456")), "123\n");

    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn apply_rejects_bad_node_type() {
    tmptree()
        .arg("apply")
        .arg(fixture("bad_type.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a string or buffer"));
}

#[test]
fn apply_rejects_empty_tree() {
    tmptree()
        .arg("apply")
        .arg(fixture("empty.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Specify one or more files"));
}

#[test]
fn apply_reports_missing_copy_source() {
    tmptree()
        .arg("apply")
        .arg(fixture("missing_copy.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("I/O error"));
}

#[test]
fn preview_reports_missing_fixture() {
    tmptree()
        .arg("preview")
        .arg(fixture("no-such-fixture.toml"))
        .assert()
        .failure();
}

#[cfg(unix)]
#[test]
fn run_command_inside_fixture_then_clean_up() {
    let output = tmptree()
        .arg("run")
        .arg(fixture("basic.toml"))
        .arg("--")
        .arg("sh")
        .arg("-c")
        .arg("test -f a.txt && test -d empty && printf %s \"$TMPTREE_ROOT\"")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let root = PathBuf::from(String::from_utf8(output).unwrap());

    assert!(!root.as_os_str().is_empty());
    assert!(!root.exists());
}

#[cfg(unix)]
#[test]
fn run_forwards_exit_code() {
    tmptree()
        .arg("run")
        .arg(fixture("basic.toml"))
        .arg("--")
        .arg("sh")
        .arg("-c")
        .arg("exit 3")
        .assert()
        .code(3);
}
