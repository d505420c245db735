use anyhow::Result;
use serde_json::json;
use tracing::warn;

use super::{attach_output, run_tool, with_project, ActionRequest, ToolRun};
use crate::artifacts::{collect_artifacts, format_bytes, missing_kinds};
use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::project::ProjectLayout;
use crate::toolchain::{build_invocation, Tool};

pub(super) fn build(ctx: &CommandContext<'_>, request: &ActionRequest) -> Result<ExecutionOutcome> {
    with_project(ctx, |layout| build_project(ctx, layout, request))
}

pub(super) fn build_project(
    ctx: &CommandContext<'_>,
    layout: &ProjectLayout,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    let invocation = build_invocation(ctx.config(), layout);
    let out_dir = layout.relative(&layout.dist_dir());

    if request.dry_run {
        return Ok(ExecutionOutcome::success(
            format!("dry-run: would run `{invocation}`"),
            json!({
                "command": invocation.to_string(),
                "out_dir": out_dir,
                "dry_run": true,
            }),
        ));
    }

    let output = match run_tool(ctx, Tool::Build, &invocation)? {
        ToolRun::Finished(output) => output,
        ToolRun::Failed(outcome) => return Ok(outcome),
    };

    let artifacts = collect_artifacts(layout)?;
    if artifacts.is_empty() {
        let mut details = json!({
            "command": invocation.to_string(),
            "out_dir": out_dir,
            "hint": format!("check that the build writes its distributions into {out_dir}/"),
        });
        attach_output(&mut details, &output);
        return Ok(ExecutionOutcome::user_error(
            "build completed but produced no artifacts",
            details,
        ));
    }

    let missing = missing_kinds(&artifacts);
    if !missing.is_empty() {
        warn!(missing = ?missing, out_dir = %out_dir, "build output is incomplete");
    }

    let first = &artifacts[0];
    let sha_short: String = first.sha256.chars().take(12).collect();
    let message = if artifacts.len() == 1 {
        format!(
            "wrote {} ({}, sha256={sha_short}…)",
            first.path,
            format_bytes(first.bytes)
        )
    } else {
        let total: u64 = artifacts.iter().map(|artifact| artifact.bytes).sum();
        format!("wrote {} artifacts ({})", artifacts.len(), format_bytes(total))
    };
    let mut details = json!({
        "artifacts": artifacts,
        "missing": missing,
        "out_dir": out_dir,
        "command": invocation.to_string(),
        "dry_run": false,
    });
    attach_output(&mut details, &output);
    Ok(ExecutionOutcome::success(message, details))
}
