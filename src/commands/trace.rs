use std::io::{self, IsTerminal, Write};

use clap::Args;

use crate::cli_util::{print_waiting_with_context, render_tape_window};
use crate::commands::{build_engine, EofPolicy, ProgramArgs, SetupError};
use crate::config;
use crate::engine::StepOutcome;
use crate::host::OutputLog;
use crate::theme::op_style;

/// Traces stop here unless told otherwise; a table row per step adds up fast.
const DEFAULT_TRACE_LIMIT: usize = 10_000;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct TraceArgs {
    #[command(flatten)]
    pub program: ProgramArgs,

    /// Stop tracing after N instructions (default 10_000)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Cells shown on each side of the pointer (fallback bf.toml; default 8)
    #[arg(short = 'w', long = "window", value_name = "R")]
    pub window: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: TraceArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let settings = config::settings();
    let code = match args.program.source(program) {
        Ok(code) => code,
        Err(SetupError::Usage) => usage_and_exit(program, 2),
        Err(SetupError::Exit(c)) => return c,
    };
    let input = match args.program.initial_input(program) {
        Ok(q) => q,
        Err(SetupError::Usage) => usage_and_exit(program, 2),
        Err(SetupError::Exit(c)) => return c,
    };
    let mut vm = match build_engine(program, &args.program, settings, &code, OutputLog::new(), input) {
        Ok(vm) => vm,
        Err(SetupError::Usage) => usage_and_exit(program, 2),
        Err(SetupError::Exit(c)) => return c,
    };

    let radius = args.window.unwrap_or(settings.window);
    let limit = args.max_steps.unwrap_or(DEFAULT_TRACE_LIMIT);
    let styled = io::stdout().is_terminal();
    let colors = styled.then_some(&settings.colors);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "STEP | IP  | PTR | CELL | INSTR | ACTION");
    let _ = writeln!(stdout, "-----+-----+-----+------+-------+------------------------------------------------");

    let mut step: usize = 0;
    let mut exit_code = 0;
    while let Some(instr) = vm.cursor().current() {
        if step >= limit {
            eprintln!("Execution paused: step limit reached ({limit})");
            exit_code = 1;
            break;
        }

        let (ip, ptr_before, cell_before) = (vm.cursor().position(), vm.tape().position(), vm.tape().read());
        let outcome = vm.step_and_pause();

        if outcome == StepOutcome::AwaitInput && args.program.eof == EofPolicy::Zero {
            vm.input_mut().push(0);
            continue;
        }

        let action = vm.last_action().map(|a| a.to_string()).unwrap_or_default();
        let (instr, action) = match colors {
            Some(c) => (
                op_style(instr).paint(instr.to_string()).to_string(),
                nu_ansi_term::Style::new().fg(c.action).paint(action).to_string(),
            ),
            None => (instr.to_string(), action),
        };
        let _ = writeln!(
            stdout,
            "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
            step, ip, ptr_before, cell_before, instr, action
        );
        step += 1;

        if outcome == StepOutcome::AwaitInput {
            let _ = stdout.flush();
            print_waiting_with_context(program, &code, ip);
            exit_code = 1;
            break;
        }
    }

    let _ = writeln!(stdout, "Tape:   {}", render_tape_window(vm.tape(), radius, colors));
    let _ = writeln!(stdout, "Output: {:?}", vm.output().to_text());
    let _ = writeln!(stdout, "Status: {}", vm.status());
    let _ = stdout.flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} trace [OPTIONS] "<code>"
  {0} trace [OPTIONS] --file <PATH>

Options:
  --file,   -f <PATH>  Read the program from PATH instead of positional "<code>"
  --input,  -i <TEXT>  Queue TEXT as input (otherwise piped stdin is used)
  --bits N             Cell width in bits, 1..=63 (default 8)
  --signed[=BOOL]      Use signed cells (--signed=false forces unsigned)
  --table              Precompute bracket jumps
  --eof <wait|zero>    When input runs out: report waiting (default) or feed 0
  --max-steps N        Stop after N instructions (default 10000)
  --window, -w R       Cells shown on each side of the pointer (at most 1024)
  --help,   -h         Show this help

Description:
  Single-steps the program and prints a table of operations, then the tape
  around the pointer, the collected output, and the final status.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
