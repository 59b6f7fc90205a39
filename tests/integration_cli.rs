// Drives the binary's non-interactive paths: add-mode, the empty-list exit
// and the fatal pre-session failures. None of these need a terminal.

use assert_cmd::Command;
use std::fs;
use std::path::Path;

fn spelldrill(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spelldrill").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn add_mode_appends_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();

    let out = spelldrill(dir.path()).arg("necessary").output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("Added \"necessary\""));

    spelldrill(dir.path()).arg("rhythm").assert().success();

    let list = fs::read_to_string(dir.path().join("spellingList.txt")).unwrap();
    assert_eq!(list, "necessary\nrhythm");
}

#[test]
fn add_mode_uses_selected_list() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("hard.txt"), "cat\n").unwrap();

    spelldrill(dir.path())
        .args(["queue", "--list", "hard.txt"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(dir.path().join("hard.txt")).unwrap(),
        "cat\nqueue"
    );
}

#[test]
fn empty_list_exits_zero_without_a_tty() {
    let dir = tempfile::tempdir().unwrap();

    let out = spelldrill(dir.path()).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("The spelling list is empty."));
    // created on first run
    assert!(dir.path().join("spellingList.txt").exists());
}

#[test]
fn invalid_repeat_is_rejected_before_session() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("spellingList.txt"), "cat").unwrap();

    for value in ["0", "-2"] {
        let out = spelldrill(dir.path())
            .args(["--repeat", value])
            .output()
            .unwrap();
        assert!(!out.status.success(), "--repeat {value} should fail");
        assert!(String::from_utf8_lossy(&out.stderr).contains("repeat count"));
    }
}

#[test]
fn unavailable_storage_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();

    let out = spelldrill(dir.path())
        .args(["--list", "no-such-dir/list.txt"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unavailable"));
}

// ProjectDirs honours XDG_CONFIG_HOME on Linux only.
#[cfg(target_os = "linux")]
#[test]
fn save_config_persists_defaults() {
    let dir = tempfile::tempdir().unwrap();

    spelldrill(dir.path())
        .args(["--repeat", "3", "--save-config"])
        .assert()
        .success();

    let saved = fs::read_to_string(
        dir.path()
            .join(".config")
            .join("spelldrill")
            .join("config.json"),
    )
    .unwrap();
    let json: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(json["required_repeats"], 3);
}

#[cfg(target_os = "linux")]
#[test]
fn invalid_repeat_is_never_saved() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir
        .path()
        .join(".config")
        .join("spelldrill")
        .join("config.json");

    let out = spelldrill(dir.path())
        .args(["--repeat", "0", "--save-config"])
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("repeat count"));
    assert!(!config.exists());

    // The next plain run still starts from valid defaults.
    let out = spelldrill(dir.path()).output().unwrap();
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("The spelling list is empty."));
}
