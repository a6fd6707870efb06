use std::io::{self, Write};

use clap::Args;

use crate::cli_util::print_waiting_with_context;
use crate::commands::{build_engine, write_values, EofPolicy, ProgramArgs, SetupError};
use crate::config;
use crate::engine::{Engine, Status};
use crate::host::OutputLog;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    #[command(flatten)]
    pub program: ProgramArgs,

    /// Give up after N instructions (default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
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

    let mut status = drive(&mut vm, args.max_steps);
    while status == Status::Waiting && args.program.eof == EofPolicy::Zero {
        vm.input_mut().push(0);
        let left = args.max_steps.map(|limit| limit.saturating_sub(vm.steps_executed() as usize));
        status = drive(&mut vm, left);
    }

    let mut stdout = io::stdout().lock();
    let _ = write_values(&mut stdout, vm.output().values());

    let exit_code = match status {
        Status::Complete => 0,
        Status::Waiting => {
            print_waiting_with_context(program, &code, vm.cursor().position());
            1
        }
        _ => {
            let limit = args.max_steps.unwrap_or_default();
            eprintln!("Execution paused: step limit reached ({limit})");
            let _ = io::stderr().flush();
            1
        }
    };

    // For readability, ensure output ends with a newline
    let _ = writeln!(stdout);
    let _ = stdout.flush();
    exit_code
}

fn drive(vm: &mut Engine, max_steps: Option<usize>) -> Status {
    match max_steps {
        Some(limit) => vm.run_steps(limit),
        None => vm.run(),
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>  Read the program from PATH instead of positional "<code>"
  --input, -i <TEXT>  Queue TEXT as input (otherwise piped stdin is used)
  --bits N            Cell width in bits, 1..=63 (default 8)
  --signed[=BOOL]     Use signed cells (--signed=false forces unsigned)
  --table             Precompute bracket jumps
  --eof <wait|zero>   When input runs out: report waiting (default) or feed 0
  --max-steps N       Pause after N instructions
  --help,  -h         Show this help

Notes:
- Runs to completion in one go; output values are printed as characters.
- Input (`,`) takes the next queued character code. When the queue is empty
  the program is left waiting and the command exits with status 1.
- Characters outside of ><+-.,[] are comments.

Examples:
- Echo stdin back:
    echo hello | {0} run --eof zero ",[.,]"
- Count down in 16-bit cells:
    {0} run --bits 16 --input "~" ",[.-]"
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
