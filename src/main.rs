use bf::commands::{run::RunArgs, tick::TickArgs, trace::TraceArgs};
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run   [OPTIONS] "<code>"      # Run to completion (or until input is needed)
  {0} trace [OPTIONS] "<code>"      # Single-step and print a table of operations
  {0} tick  [OPTIONS] "<code>"      # Animate: one instruction per timer tick

Shared options: --file <PATH>, --input <TEXT>, --bits N, --signed[=BOOL], --table, --eof <wait|zero>

Settings are read from bf.toml in the XDG config home; BF_BITS, BF_SIGNED and
BF_SPEED_MS override it. BF_LOG sets the log filter (default "warn").

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Trace(TraceArgs),
    Tick(TickArgs),
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("BF_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    init_logging();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        print_top_usage_and_exit(&program, if cli.help { 0 } else { 2 });
    };
    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match command {
        Command::Run(args) => bf::commands::run::run(&program, args),
        Command::Trace(args) => bf::commands::trace::run(&program, args),
        Command::Tick(args) => bf::commands::tick::run(&program, args),
    };

    std::process::exit(code);
}
