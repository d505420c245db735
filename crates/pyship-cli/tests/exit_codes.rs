use assert_cmd::cargo::cargo_bin_cmd;

mod common;

use common::{parse_json, prepare_project, stderr};

#[test]
fn unknown_command_exits_two_and_lists_known_commands() {
    let (_temp, root) = prepare_project("pyship-unknown");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["ship"])
        .assert()
        .code(2);
    let stderr = stderr(&assert);
    assert!(stderr.contains("ship"), "stderr: {stderr}");
    assert!(stderr.contains("clean, build, publish, deploy"), "stderr: {stderr}");
}

#[test]
fn missing_project_is_a_user_error() {
    let temp = tempfile::tempdir().expect("tempdir");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(temp.path())
        .args(["build"])
        .assert()
        .code(1);
    assert!(stderr(&assert).contains("no Python project found"));
}

#[test]
fn missing_command_is_a_usage_error() {
    cargo_bin_cmd!("pyship").assert().code(2);
}

#[test]
fn publish_with_empty_dist_exits_one() {
    let (_temp, root) = prepare_project("pyship-publish-empty");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .env("PYSHIP_UPLOAD_CMD", "definitely-not-a-real-upload-tool")
        .args(["--json", "publish"])
        .assert()
        .code(1);
    let payload = parse_json(&assert);
    assert_eq!(payload["status"], "user-error");
    assert_eq!(payload["exit_code"], 1);
    assert!(payload["message"]
        .as_str()
        .expect("message")
        .contains("no artifacts found"));
}

#[test]
fn missing_toolchain_exits_127() {
    let (_temp, root) = prepare_project("pyship-no-tool");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .env("PYSHIP_BUILD_CMD", "definitely-not-a-real-build-tool --wheel")
        .args(["build"])
        .assert()
        .code(127);
    assert!(stderr(&assert).contains("PYSHIP_BUILD_CMD"));
}
