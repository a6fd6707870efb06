use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Args;

use crate::cli_util::{print_error, print_waiting_with_context};
use crate::commands::{build_engine, write_values, EofPolicy, ProgramArgs, SetupError};
use crate::config;
use crate::engine::Status;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct TickArgs {
    #[command(flatten)]
    pub program: ProgramArgs,

    /// Milliseconds between ticks (fallback BF_SPEED_MS / bf.toml; default 50)
    #[arg(short = 's', long = "speed", value_name = "MS")]
    pub speed_ms: Option<u64>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: TickArgs) -> i32 {
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

    // Output is streamed as soon as `.` executes rather than collected.
    let sink = |value: i64| {
        let _ = write_values(&mut io::stdout().lock(), &[value]);
    };
    let mut vm = match build_engine(program, &args.program, settings, &code, sink, input) {
        Ok(vm) => vm,
        Err(SetupError::Usage) => usage_and_exit(program, 2),
        Err(SetupError::Exit(c)) => return c,
    };
    vm.set_notify(|obs| {
        tracing::trace!(status = %obs.status, ip = obs.ip, steps = obs.steps, ptr = obs.tape.position(), "tick");
    });

    // Ctrl+C pauses between ticks instead of killing the process mid-output.
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
        print_error(&format!("{program}: failed to set ctrl+c handler: {e}"));
        return 1;
    }

    let interval = Duration::from_millis(args.speed_ms.unwrap_or(settings.speed_ms));
    vm.start();
    let status = loop {
        if interrupted.load(Ordering::Relaxed) {
            vm.pause();
        }
        let status = vm.tick();
        match status {
            Status::Running => thread::sleep(interval),
            Status::Waiting if args.program.eof == EofPolicy::Zero => vm.input_mut().push(0),
            other => break other,
        }
    };

    let exit_code = match status {
        Status::Complete => 0,
        Status::Paused => {
            eprintln!(
                "Paused at instruction {} after {} steps",
                vm.cursor().position(),
                vm.steps_executed()
            );
            0
        }
        _ => {
            print_waiting_with_context(program, &code, vm.cursor().position());
            1
        }
    };

    println!();
    let _ = io::stdout().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} tick [OPTIONS] "<code>"
  {0} tick [OPTIONS] --file <PATH>

Options:
  --file,  -f <PATH>  Read the program from PATH instead of positional "<code>"
  --input, -i <TEXT>  Queue TEXT as input (otherwise piped stdin is used)
  --bits N            Cell width in bits, 1..=63 (default 8)
  --signed[=BOOL]     Use signed cells (--signed=false forces unsigned)
  --table             Precompute bracket jumps
  --eof <wait|zero>   When input runs out: report waiting (default) or feed 0
  --speed, -s <MS>    Milliseconds between ticks (default 50)
  --help,  -h         Show this help

Description:
  Executes one instruction per tick, the way a visualizer animates a run.
  Output is printed as it is produced.

Notes:
  - Ctrl+C pauses the program, reports where it stopped, and exits 0.
  - Set BF_LOG=trace to log every tick to stderr.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
