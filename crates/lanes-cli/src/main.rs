mod cmd;
mod output;

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "lanes",
    author,
    version,
    about = "lanes: commit-graph lane layout",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a terminal, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Layout config file, overriding user and project config.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Layout",
        about = "Lay out a commit history",
        long_about = "Assign a lane, position and color to every commit in a JSON history \
                      (newest first) and print the positioned rows.",
        after_help = "EXAMPLES:\n    # Preview lanes for a history file\n    lanes layout history.json\n\n    # Read from stdin\n    git-export | lanes layout -\n\n    # Emit the full layout with edges\n    lanes layout history.json --format json"
    )]
    Layout(cmd::layout::LayoutArgs),

    #[command(
        next_help_heading = "Layout",
        about = "List child-to-parent edges",
        after_help = "EXAMPLES:\n    # Straight and curved connectors\n    lanes edges history.json\n\n    # Emit machine-readable output\n    lanes edges history.json --json"
    )]
    Edges(cmd::edges::EdgesArgs),

    #[command(
        next_help_heading = "Interaction",
        about = "Find the commit under a canvas point",
        long_about = "Hit-test a canvas coordinate against the laid-out history. Prints `none` \
                      when nothing is within reach.",
        after_help = "EXAMPLES:\n    # Which commit is at (12, 36)?\n    lanes hit history.json --x 12 --y 36"
    )]
    Hit(cmd::hit::HitArgs),

    #[command(
        next_help_heading = "Configuration",
        about = "Show the effective layout config",
        after_help = "EXAMPLES:\n    # Show the config in effect here\n    lanes config\n\n    # Check a specific file\n    lanes config --config ./lanes.toml"
    )]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Configuration",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    lanes completions bash > ~/.local/share/bash-completion/completions/lanes"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("LANES_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "lanes=debug,info"
        } else {
            "lanes=info,warn"
        })
    });

    let format = env::var("LANES_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let project_root = env::current_dir()?;
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Layout(args) => cmd::layout::run_layout(args, output, &project_root, config),
        Commands::Edges(args) => cmd::edges::run_edges(args, output, &project_root, config),
        Commands::Hit(args) => cmd::hit::run_hit(args, output, &project_root, config),
        Commands::Config(args) => cmd::config::run_config(args, output, &project_root, config),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let output = cli.output_mode();
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("command failed: {err:#}");
            if let Err(render_err) = render_error(output, &CliError::from_anyhow(&err)) {
                eprintln!("error: {err:#} ({render_err})");
            }
            ExitCode::FAILURE
        }
    }
}
