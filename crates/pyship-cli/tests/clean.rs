use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

mod common;

use common::{parse_json, prepare_project, stdout};

#[test]
fn clean_without_artifacts_succeeds() {
    let (_temp, root) = prepare_project("pyship-clean-empty");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["clean"])
        .assert()
        .success();
    assert!(stdout(&assert).contains("nothing to remove"));
}

#[test]
fn clean_removes_outputs_and_is_idempotent() {
    let (_temp, root) = prepare_project("pyship-clean");
    fs::create_dir_all(root.join("dist")).expect("dist");
    fs::write(root.join("dist").join("old.whl"), "stale").expect("stale wheel");
    fs::create_dir_all(root.join("build").join("lib")).expect("build");
    fs::create_dir_all(root.join("demo_pkg.egg-info")).expect("egg-info");

    cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["clean"])
        .assert()
        .success();
    assert!(!root.join("dist").exists());
    assert!(!root.join("build").exists());
    assert!(!root.join("demo_pkg.egg-info").exists());
    assert!(root.join("demo_pkg").join("__init__.py").exists());

    cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["clean"])
        .assert()
        .success();
}

#[test]
fn clean_dry_run_keeps_files() {
    let (_temp, root) = prepare_project("pyship-clean-dry");
    fs::create_dir_all(root.join("build")).expect("build");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["--dry-run", "clean"])
        .assert()
        .success();
    assert!(stdout(&assert).contains("would remove build"));
    assert!(root.join("build").exists());
}

#[test]
fn clean_finds_the_project_from_a_subdirectory() {
    let (_temp, root) = prepare_project("pyship-clean-nested");
    fs::create_dir_all(root.join("build")).expect("build");

    cargo_bin_cmd!("pyship")
        .current_dir(root.join("demo_pkg"))
        .args(["clean"])
        .assert()
        .success();
    assert!(!root.join("build").exists());
}

#[test]
fn clean_outside_a_project_exits_zero() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(temp.path().join("dist")).expect("dist");

    cargo_bin_cmd!("pyship")
        .current_dir(temp.path())
        .args(["clean"])
        .assert()
        .success();
    assert!(!temp.path().join("dist").exists());
}

#[test]
fn clean_removes_metadata_of_a_setup_py_project() {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = temp.path().join("dymo-api-python");
    fs::create_dir_all(root.join("dymoapi.egg-info")).expect("egg-info");
    fs::write(
        root.join("setup.py"),
        "from setuptools import setup\nsetup(name='dymoapi')\n",
    )
    .expect("write setup.py");

    let assert = cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["--json", "clean"])
        .assert()
        .success();
    let payload = parse_json(&assert);
    assert_eq!(payload["details"]["removed"], serde_json::json!(["dymoapi.egg-info"]));
    assert!(!root.join("dymoapi.egg-info").exists());
}

#[test]
fn clean_survives_a_malformed_pyproject() {
    let (_temp, root) = prepare_project("pyship-clean-malformed");
    fs::write(root.join("pyproject.toml"), "[project\nname = \"x\"\n").expect("break pyproject");
    fs::create_dir_all(root.join("build")).expect("build");

    cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["clean"])
        .assert()
        .success();
    assert!(!root.join("build").exists());

    fs::write(
        root.join("pyproject.toml"),
        "[project]\nname = \"demo-pkg\"\n\n[tool.pyship]\nbuild-command = \"make dist\"\n",
    )
    .expect("bad settings");
    fs::create_dir_all(root.join("dist")).expect("dist");
    cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["clean"])
        .assert()
        .success();
    assert!(!root.join("dist").exists());

    cargo_bin_cmd!("pyship")
        .current_dir(&root)
        .args(["build"])
        .assert()
        .code(1);
}
