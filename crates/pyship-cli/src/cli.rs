use clap::{ArgAction, Parser};

pub const PYSHIP_HELP_TEMPLATE: &str =
    "{before-help}\nUsage:\n    {usage}\n\nOptions:\n{options}\n";

pub const PYSHIP_BEFORE_HELP: &str = concat!(
    "pyship ",
    env!("CARGO_PKG_VERSION"),
    " – release a Python distribution\n\n",
    "\x1b[1;36mCommands\x1b[0m\n",
    "  clean            Remove dist/, build/ and the project's .egg-info directory.\n",
    "  build            Run the packaging toolchain to write an sdist and a wheel into dist/.\n",
    "  publish          Upload every file in dist/ with the upload tool.\n",
    "  deploy           clean, build, then publish; stops at the first failing step.\n\n",
    "\x1b[1;36mToolchain overrides\x1b[0m\n",
    "  PYSHIP_PYTHON, PYSHIP_BUILD_CMD, PYSHIP_UPLOAD_CMD, PYSHIP_REPOSITORY,\n",
    "  or [tool.pyship] in pyproject.toml.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "pyship",
    author,
    version,
    disable_help_subcommand = true,
    before_help = PYSHIP_BEFORE_HELP,
    help_template = PYSHIP_HELP_TEMPLATE,
    override_usage = "pyship [OPTIONS] <COMMAND> [ARGS]..."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct PyshipCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)"
    )]
    pub quiet: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase logging (-vv reaches debug)")]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q")]
    pub trace: bool,
    #[arg(long, help = "Emit {status,message,details} JSON envelopes")]
    pub json: bool,
    #[arg(long, help = "Disable colored human output")]
    pub no_color: bool,
    #[arg(long, help = "Show what would run without deleting or executing anything")]
    pub dry_run: bool,
    #[arg(
        long,
        value_name = "NAME",
        help = "Repository passed to the default upload tool (overrides PYSHIP_REPOSITORY)"
    )]
    pub repository: Option<String>,
    #[arg(value_name = "COMMAND", help = "One of: clean, build, publish, deploy")]
    pub command: String,
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        help = "Extra arguments forwarded to the command; options after the first one are forwarded too"
    )]
    pub args: Vec<String>,
}
