use anyhow::Result;
use serde_json::json;

use super::{attach_output, run_tool, with_project, ActionRequest, ToolRun};
use crate::artifacts::collect_artifacts;
use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::project::ProjectLayout;
use crate::toolchain::{self, upload_invocation, Tool};

pub(super) fn publish(
    ctx: &CommandContext<'_>,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    with_project(ctx, |layout| publish_project(ctx, layout, request))
}

/// Uploads every file in `dist/`. An empty `dist/` is a user error and the
/// upload tool is not started.
pub(super) fn publish_project(
    ctx: &CommandContext<'_>,
    layout: &ProjectLayout,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    let dist_dir = layout.relative(&layout.dist_dir());
    let artifacts = collect_artifacts(layout)?;
    if artifacts.is_empty() {
        return Ok(ExecutionOutcome::user_error(
            format!("no artifacts found in {dist_dir} (run `pyship build` first)"),
            json!({
                "dist_dir": dist_dir,
                "hint": "run `pyship build` or `pyship deploy`",
            }),
        ));
    }

    let repository = toolchain::repository(request.repository.as_deref(), ctx.config(), layout);
    let target = repository.unwrap_or("the default index");
    let invocation = upload_invocation(ctx.config(), layout, repository, &artifacts);

    if request.dry_run {
        return Ok(ExecutionOutcome::success(
            format!("dry-run: would upload {} artifacts to {target}", artifacts.len()),
            json!({
                "repository": repository,
                "command": invocation.to_string(),
                "artifacts": artifacts,
                "dry_run": true,
            }),
        ));
    }

    let output = match run_tool(ctx, Tool::Upload, &invocation)? {
        ToolRun::Finished(output) => output,
        ToolRun::Failed(outcome) => return Ok(outcome),
    };

    let mut details = json!({
        "repository": repository,
        "command": invocation.to_string(),
        "artifacts": artifacts,
        "dry_run": false,
    });
    attach_output(&mut details, &output);
    Ok(ExecutionOutcome::success(
        format!("uploaded {} artifacts to {target}", artifacts.len()),
        details,
    ))
}
