use anyhow::Result;
use serde_json::json;
use tracing::{info, warn};

use super::ActionRequest;
use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::project::ProjectLayout;

/// Outside a project, the working directory's outputs are cleaned instead.
pub(super) fn clean(ctx: &CommandContext<'_>, request: &ActionRequest) -> Result<ExecutionOutcome> {
    match ctx.project() {
        Some(layout) => clean_project(ctx, layout, request),
        None => {
            info!(cwd = %ctx.cwd().display(), "no project found; cleaning the working directory");
            clean_project(ctx, &ProjectLayout::load(ctx.cwd()), request)
        }
    }
}

/// Removes `dist/`, `build/` and the egg-info directories.
///
/// Absent paths are skipped; paths that cannot be removed are reported but never
/// turn the outcome into a failure.
pub(super) fn clean_project(
    ctx: &CommandContext<'_>,
    layout: &ProjectLayout,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    let targets = layout.clean_targets();

    if request.dry_run {
        let would_remove: Vec<String> = targets
            .iter()
            .filter(|path| ctx.fs().exists(path))
            .map(|path| layout.relative(path))
            .collect();
        let message = if would_remove.is_empty() {
            "dry-run: nothing to remove".to_string()
        } else {
            format!("dry-run: would remove {}", would_remove.join(", "))
        };
        return Ok(ExecutionOutcome::success(
            message,
            json!({
                "would_remove": would_remove,
                "dry_run": true,
            }),
        ));
    }

    let mut removed = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    for target in &targets {
        let relative = layout.relative(target);
        match ctx.fs().remove_dir_all(target) {
            Ok(true) => {
                info!(path = %relative, "removed");
                removed.push(relative);
            }
            Ok(false) => skipped.push(relative),
            Err(err) => {
                warn!(path = %relative, error = %format!("{err:#}"), "could not remove");
                failed.push(json!({ "path": relative, "error": format!("{err:#}") }));
            }
        }
    }

    let message = match (removed.is_empty(), failed.is_empty()) {
        (true, true) => "nothing to remove".to_string(),
        (false, true) => format!("removed {}", removed.join(", ")),
        (_, false) => format!(
            "removed {} path(s); {} could not be removed",
            removed.len(),
            failed.len()
        ),
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "removed": removed,
            "skipped": skipped,
            "failed": failed,
            "dry_run": false,
        }),
    ))
}
