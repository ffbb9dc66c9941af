use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ARTIFACT: &[u8] = b"\x1bLuaQ\x00\x01\x04\x08\x04\x08";

fn cmd() -> Command {
    Command::cargo_bin("delua").unwrap()
}

fn write(path: &Path, data: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

/// Writes a shell script that stands in for `java -jar unluac.jar`.
///
/// It prints a fixed header plus the source path, and fails with exit code 2
/// for files named `corrupt.luac`.
#[cfg(unix)]
fn fake_runtime(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-java");
    fs::write(
        &path,
        r#"#!/bin/sh
case "$4" in
  *corrupt.luac) echo "partial output"; echo "bad constant" >&2; exit 2 ;;
esac
echo "-- decompiled by $2"
echo "-- $(basename "$4")"
"#,
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn invalid_input_is_reported() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg(dir.path().join("does-not-exist"))
        .args(["--tool-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("neither a file nor a directory"));
    assert!(!dir.path().join("does-not-exist.src").exists());
}

#[test]
fn plain_directory_is_mirrored() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data");
    write(&input.join("readme.txt"), b"hello");
    write(&input.join("nested/deeper/table.lua"), b"return {}\n");
    write(&input.join("nested/tiny"), b"\x1bLu");

    cmd()
        .arg(&input)
        .arg("--tool-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("readme.txt"))
        .stdout(contains("table.lua"));

    let out = dir.path().join("data.src");
    assert_eq!(fs::read(out.join("readme.txt")).unwrap(), b"hello");
    assert_eq!(
        fs::read(out.join("nested/deeper/table.lua")).unwrap(),
        b"return {}\n"
    );
    assert_eq!(fs::read(out.join("nested/tiny")).unwrap(), b"\x1bLu");
}

#[cfg(unix)]
#[test]
fn mixed_directory_is_converted() {
    let dir = TempDir::new().unwrap();
    let runtime = fake_runtime(dir.path());
    let input = dir.path().join("scripts");
    write(&input.join("a.txt"), b"0123456789");
    write(&input.join("b.bin"), ARTIFACT);

    cmd()
        .arg(&input)
        .arg("--runtime")
        .arg(&runtime)
        .arg("--tool-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("a.txt"))
        .stdout(contains("b.bin"));

    let out = dir.path().join("scripts.src");
    assert_eq!(fs::read(out.join("a.txt")).unwrap(), b"0123456789");
    assert_eq!(
        fs::read_to_string(out.join("b.bin")).unwrap(),
        "-- decompiled by unluac.jar\n-- b.bin\n"
    );
}

#[cfg(unix)]
#[test]
fn single_file_gets_src_lua_extension() {
    let dir = TempDir::new().unwrap();
    let runtime = fake_runtime(dir.path());
    let input = dir.path().join("script.luac");
    write(&input, ARTIFACT);

    cmd()
        .arg(&input)
        .arg("--runtime")
        .arg(&runtime)
        .arg("--tool-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("script.luac"));

    assert_eq!(
        fs::read_to_string(dir.path().join("script.src.lua")).unwrap(),
        "-- decompiled by unluac.jar\n-- script.luac\n"
    );
}

#[cfg(unix)]
#[test]
fn decompiler_failure_does_not_stop_batch() {
    let dir = TempDir::new().unwrap();
    let runtime = fake_runtime(dir.path());
    let input = dir.path().join("mod");
    write(&input.join("a_first.luac"), ARTIFACT);
    write(&input.join("corrupt.luac"), ARTIFACT);
    write(&input.join("z_last.txt"), b"last");

    cmd()
        .arg(&input)
        .arg("--runtime")
        .arg(&runtime)
        .arg("--tool-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("corrupt.luac"))
        .stdout(contains("exit code 2"))
        .stdout(contains("bad constant"))
        .stdout(contains("partial output"));

    let out = dir.path().join("mod.src");
    assert!(out.join("a_first.luac").is_file());
    assert!(!out.join("corrupt.luac").exists());
    assert_eq!(fs::read(out.join("z_last.txt")).unwrap(), b"last");
}

#[cfg(unix)]
#[test]
fn missing_runtime_fails_per_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("pkg");
    write(&input.join("one.luac"), ARTIFACT);
    write(&input.join("two.txt"), b"two");

    cmd()
        .arg(&input)
        .arg("--runtime")
        .arg(dir.path().join("no-java-here"))
        .arg("--tool-dir")
        .arg(dir.path())
        .args(["--jobs", "2"])
        .assert()
        .success()
        .stdout(contains("failed to launch decompiler"));

    let out = dir.path().join("pkg.src");
    assert!(!out.join("one.luac").exists());
    assert_eq!(fs::read(out.join("two.txt")).unwrap(), b"two");
}
