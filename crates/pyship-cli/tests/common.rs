#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::assert::Assert;
use serde_json::Value;
use tempfile::TempDir;

pub const SDIST: &str = "demo_pkg-0.1.0.tar.gz";
pub const WHEEL: &str = "demo_pkg-0.1.0-py3-none-any.whl";

/// A `pyproject.toml` project inside a fresh tempdir.
pub fn prepare_project(prefix: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let root = temp.path().join("demo-pkg");
    fs::create_dir_all(root.join("demo_pkg")).expect("package dir");
    fs::write(
        root.join("pyproject.toml"),
        "[project]\nname = \"demo-pkg\"\nversion = \"0.1.0\"\n",
    )
    .expect("write pyproject");
    fs::write(root.join("demo_pkg").join("__init__.py"), "").expect("write module");
    (temp, root)
}

/// Writes a shell script under `dir` and returns the command string that runs it.
pub fn stub(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub");
    format!("sh {}", path.display())
}

/// A build stub that leaves an sdist and a wheel in `dist/` plus the usual byproducts.
pub fn working_build(dir: &Path) -> String {
    stub(
        dir,
        "build.sh",
        &format!(
            "mkdir -p dist build/lib demo_pkg.egg-info\n\
             printf 'sdist' > dist/{SDIST}\n\
             printf 'wheel' > dist/{WHEEL}"
        ),
    )
}

/// An upload stub that records its arguments, one per line, in `log`.
pub fn recording_upload(dir: &Path, log: &Path) -> String {
    stub(
        dir,
        "upload.sh",
        &format!("for arg in \"$@\"; do echo \"$arg\" >> {}; done", log.display()),
    )
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}
