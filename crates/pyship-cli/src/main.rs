use std::sync::Arc;

use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use pyship_core::{ActionRequest, CommandContext, GlobalOptions, SharedEffects, SystemEffects};

mod cli;
mod output;
mod style;

use cli::PyshipCli;
use output::OutputOptions;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = PyshipCli::parse();
    init_tracing(cli.trace, cli.verbose);

    let global = GlobalOptions { json: cli.json };
    let effects: SharedEffects = Arc::new(SystemEffects::new());
    let ctx = CommandContext::new(&global, effects).map_err(|err| eyre!("{err:?}"))?;
    let request = ActionRequest {
        args: cli.args.clone(),
        dry_run: cli.dry_run,
        repository: cli.repository.clone(),
    };

    tracing::debug!(command = %cli.command, dry_run = cli.dry_run, "dispatching");
    let outcome =
        pyship_core::execute(&ctx, &cli.command, &request).map_err(|err| eyre!("{err:?}"))?;
    let opts = OutputOptions {
        quiet: cli.quiet,
        json: cli.json,
        no_color: cli.no_color,
        verbose: cli.verbose,
    };
    let code = output::emit_output(&opts, &cli.command, &outcome)?;

    if code == 0 {
        Ok(())
    } else {
        std::process::exit(code);
    }
}

fn init_tracing(trace: bool, verbose: u8) {
    let level = if trace {
        "trace"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };

    let filter = format!("pyship={level},pyship_core={level}");
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
