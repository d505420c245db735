use atty::Stream;
use color_eyre::Result;
use pyship_core::{format_status_message, to_json_response, CommandStatus, ExecutionOutcome};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
    pub verbose: u8,
}

/// Renders `outcome` and returns the process exit code.
pub fn emit_output(opts: &OutputOptions, command: &str, outcome: &ExecutionOutcome) -> Result<i32> {
    let code = outcome.process_exit_code();

    if opts.json {
        let payload = to_json_response(command, outcome, code);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    let message = format_status_message(command, &outcome.message);
    if outcome.status == CommandStatus::Ok {
        if opts.quiet {
            return Ok(code);
        }
        let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
        println!("{}", style.status(outcome.status, &message));
        for line in artifact_lines(&outcome.details, opts.verbose) {
            println!("{}", style.dim(&line));
        }
    } else {
        let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
        eprintln!("{}", style.status(outcome.status, &message));
        if let Some(hint) = outcome.hint() {
            eprintln!("{}", style.info(&format!("Hint: {hint}")));
        }
    }
    Ok(code)
}

// Artifact paths are listed at -v; sizes and digests at -vv.
fn artifact_lines(details: &Value, verbose: u8) -> Vec<String> {
    if verbose == 0 {
        return Vec::new();
    }
    let Some(artifacts) = details.get("artifacts").and_then(Value::as_array) else {
        return Vec::new();
    };
    artifacts
        .iter()
        .filter_map(|artifact| {
            let path = artifact.get("path")?.as_str()?;
            if verbose < 2 {
                return Some(format!("  {path}"));
            }
            let bytes = artifact.get("bytes").and_then(Value::as_u64).unwrap_or(0);
            let sha = artifact.get("sha256").and_then(Value::as_str).unwrap_or("");
            Some(format!("  {path} ({bytes} bytes, sha256={sha})"))
        })
        .collect()
}
