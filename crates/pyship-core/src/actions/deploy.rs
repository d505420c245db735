use anyhow::Result;
use serde_json::{json, Map, Value};
use tracing::info;

use super::build::build_project;
use super::clean::clean_project;
use super::publish::publish_project;
use super::{with_project, ActionName, ActionRequest};
use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::project::ProjectLayout;
use crate::toolchain::{self, upload_invocation};

type StepFn =
    fn(&CommandContext<'_>, &ProjectLayout, &ActionRequest) -> Result<ExecutionOutcome>;

const STEPS: [(ActionName, StepFn); 3] = [
    (ActionName::Clean, clean_project),
    (ActionName::Build, build_project),
    (ActionName::Publish, publish_step),
];

pub(super) fn deploy(ctx: &CommandContext<'_>, request: &ActionRequest) -> Result<ExecutionOutcome> {
    with_project(ctx, |layout| deploy_project(ctx, layout, request))
}

/// Runs clean, build and publish in order, stopping at the first step that does
/// not succeed. Nothing is rolled back.
fn deploy_project(
    ctx: &CommandContext<'_>,
    layout: &ProjectLayout,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    let mut completed: Vec<&'static str> = Vec::new();
    let mut steps = Map::new();
    for (name, step) in STEPS {
        info!(step = name.as_str(), "deploy");
        let outcome = step(ctx, layout, request)?;
        if !outcome.is_ok() {
            let message = format!("{name} step failed: {}", outcome.message);
            return Ok(ExecutionOutcome {
                message,
                ..outcome
            }
            .with_details(json!({
                "step": name.as_str(),
                "completed": completed,
            })));
        }
        steps.insert(name.as_str().to_string(), outcome.details);
        completed.push(name.as_str());
    }

    let uploaded = steps
        .get(ActionName::Publish.as_str())
        .and_then(|details| details.get("artifacts"))
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let message = if request.dry_run {
        "dry-run: would clean, build and publish".to_string()
    } else {
        format!("cleaned, built and uploaded {uploaded} artifacts")
    };
    Ok(ExecutionOutcome::success(
        message,
        json!({
            "completed": completed,
            "steps": Value::Object(steps),
            "dry_run": request.dry_run,
        }),
    ))
}

// During a dry run `dist/` still holds whatever the skipped build would replace,
// so the plan names the upload command instead of listing files.
fn publish_step(
    ctx: &CommandContext<'_>,
    layout: &ProjectLayout,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    if !request.dry_run {
        return publish_project(ctx, layout, request);
    }
    let repository = toolchain::repository(request.repository.as_deref(), ctx.config(), layout);
    let invocation = upload_invocation(ctx.config(), layout, repository, &[]);
    let dist_dir = layout.relative(&layout.dist_dir());
    Ok(ExecutionOutcome::success(
        format!("dry-run: would run `{invocation} {dist_dir}/*`"),
        json!({
            "repository": repository,
            "command": format!("{invocation} {dist_dir}/*"),
            "dry_run": true,
        }),
    ))
}
