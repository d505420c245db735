use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::project::ProjectLayout;

const SDIST_SUFFIXES: [&str; 4] = [".tar.gz", ".zip", ".tar.bz2", ".tar.xz"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Sdist,
    Wheel,
    Other,
}

impl ArtifactKind {
    #[must_use]
    pub fn of(path: &Path) -> Self {
        let Some(name) = path.file_name().map(|name| name.to_string_lossy().to_lowercase()) else {
            return ArtifactKind::Other;
        };
        if name.ends_with(".whl") {
            ArtifactKind::Wheel
        } else if SDIST_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            ArtifactKind::Sdist
        } else {
            ArtifactKind::Other
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ArtifactSummary {
    pub path: String,
    pub kind: ArtifactKind,
    pub bytes: u64,
    pub sha256: String,
}

/// Lists every regular file in the project's `dist/`, sorted by path.
///
/// A missing `dist/` yields an empty list.
pub(crate) fn collect_artifacts(layout: &ProjectLayout) -> Result<Vec<ArtifactSummary>> {
    let dist = layout.dist_dir();
    let entries = match fs::read_dir(&dist) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err).with_context(|| format!("reading {}", dist.display())),
    };
    let mut artifacts = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let bytes = fs::metadata(&path)
            .with_context(|| format!("inspecting {}", path.display()))?
            .len();
        artifacts.push(ArtifactSummary {
            path: layout.relative(&path),
            kind: ArtifactKind::of(&path),
            bytes,
            sha256: compute_file_sha256(&path)?,
        });
    }
    artifacts.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(artifacts)
}

/// Distribution kinds a release needs but the artifact set lacks.
pub(crate) fn missing_kinds(artifacts: &[ArtifactSummary]) -> Vec<ArtifactKind> {
    [ArtifactKind::Sdist, ArtifactKind::Wheel]
        .into_iter()
        .filter(|kind| !artifacts.iter().any(|artifact| artifact.kind == *kind))
        .collect()
}

pub(crate) fn compute_file_sha256(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    fn format_scaled(value: u64, unit: u64, suffix: &str) -> String {
        let whole = value / unit;
        let remainder = value % unit;
        let tenths = (remainder * 10) / unit;
        format!("{whole}.{tenths} {suffix}")
    }

    if bytes >= MB {
        format_scaled(bytes, MB, "MB")
    } else if bytes >= KB {
        format_scaled(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}
