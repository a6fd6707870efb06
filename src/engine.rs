//! The interpreter: operator dispatch, loop jumps, and the run/pause/wait
//! status machine.
//!
//! The engine never blocks and never owns a timer. A host drives it in one of
//! three ways:
//!
//! - [`Engine::run`] steps synchronously until the program ends or needs input;
//! - [`Engine::run_steps`] does the same but gives up after a step budget;
//! - [`Engine::start`] followed by one [`Engine::tick`] per host timer tick.
//!
//! When `,` finds the input queue empty the engine parks in
//! [`Status::Waiting`] without consuming the instruction. Push input through
//! [`Engine::input_mut`] and drive it again to resume.

use std::fmt;

use crate::cursor::Cursor;
use crate::host::{code_to_char, InputProvider, InputQueue, Observation, OutputLog, OutputSink};
use crate::tape::{CellRange, Tape};

/// Result of executing a single instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction was applied (or there was nothing left to apply).
    Continue,
    /// `,` found no input; the cursor still points at it.
    AwaitInput,
}

/// Where the engine is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Fresh, reset, or explicitly stopped.
    #[default]
    Stopped,
    /// Being driven by `run`, `run_steps` or `tick`.
    Running,
    /// Halted on request with state intact.
    Paused,
    /// Blocked on `,` until the host supplies input.
    Waiting,
    /// Reached the end of the program.
    Complete,
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Running
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Stopped => "stopped",
            Status::Running => "running",
            Status::Paused => "paused",
            Status::Waiting => "waiting",
            Status::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// How `[` and `]` find their partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BracketStrategy {
    /// Walk the program one character at a time, counting nesting depth.
    #[default]
    Scan,
    /// Precompute every landing position once per program.
    Table,
}

/// What the last step did, in terms a visualizer can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MovePointer { to: i64 },
    Increment { at: i64, from: i64, to: i64 },
    Decrement { at: i64, from: i64, to: i64 },
    Output { value: i64 },
    Input { value: i64 },
    AwaitInput,
    SkipLoop { to: usize },
    EnterLoop,
    JumpBack { to: usize },
    ExitLoop,
    NoOp { ch: char },
    EndOfStream,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Action::MovePointer { to } => write!(f, "Moved pointer head to index {to}"),
            Action::Increment { at, from, to } => write!(f, "Increment cell[{at}] from {from} to {to}"),
            Action::Decrement { at, from, to } => write!(f, "Decrement cell[{at}] from {from} to {to}"),
            Action::Output { value } => write!(f, "Output {value} ({:?})", code_to_char(value)),
            Action::Input { value } => write!(f, "Read input -> {value}"),
            Action::AwaitInput => write!(f, "Input queue empty; waiting"),
            Action::SkipLoop { to } => write!(f, "Cell is 0; jump forward past matching ']' to IP {to}"),
            Action::EnterLoop => write!(f, "Enter loop (cell != 0)"),
            Action::JumpBack { to } => write!(f, "Cell != 0; jump back past matching '[' to IP {to}"),
            Action::ExitLoop => write!(f, "Exit loop (cell is 0)"),
            Action::NoOp { ch } => write!(f, "Skip {ch:?}"),
            Action::EndOfStream => write!(f, "End of program"),
        }
    }
}

/// Construction-time knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub range: CellRange,
    pub brackets: BracketStrategy,
}

type NotifyHook = Box<dyn FnMut(&Observation<'_>)>;

/// Tape VM for the eight-operator language `> < + - . , [ ]`.
///
/// Output goes to `O`, input comes from `I`. Both default to in-memory
/// buffers the host can reach through [`Engine::output_mut`] and
/// [`Engine::input_mut`] between calls.
pub struct Engine<O = OutputLog, I = InputQueue> {
    cursor: Cursor,
    tape: Tape,
    status: Status,
    brackets: BracketStrategy,
    // Landing position per bracket index, only for `BracketStrategy::Table`.
    jumps: Vec<Option<usize>>,
    output: O,
    input: I,
    notify: Option<NotifyHook>,
    steps: u64,
    last_action: Option<Action>,
}

impl Engine {
    /// Engine over `code` with 8-bit unsigned cells and in-memory I/O.
    pub fn new(code: &str) -> Self {
        Self::with_options(code, EngineOptions::default())
    }

    pub fn with_options(code: &str, options: EngineOptions) -> Self {
        Self::with_host(code, options, OutputLog::new(), InputQueue::new())
    }
}

impl<O: OutputSink, I: InputProvider> Engine<O, I> {
    /// Engine wired to host-provided collaborators.
    pub fn with_host(code: &str, options: EngineOptions, output: O, input: I) -> Self {
        let cursor = Cursor::new(code);
        let jumps = match options.brackets {
            BracketStrategy::Table => build_jump_table(cursor.as_chars()),
            BracketStrategy::Scan => Vec::new(),
        };
        Self {
            cursor,
            tape: Tape::new(options.range),
            status: Status::Stopped,
            brackets: options.brackets,
            jumps,
            output,
            input,
            notify: None,
            steps: 0,
            last_action: None,
        }
    }

    /// Install the hook called after each tick or manual step and once at the
    /// end of `run` / `run_steps`.
    pub fn set_notify<F>(&mut self, hook: F)
    where
        F: FnMut(&Observation<'_>) + 'static,
    {
        self.notify = Some(Box::new(hook));
    }

    pub fn clear_notify(&mut self) {
        self.notify = None;
    }

    pub fn status(&self) -> Status { self.status }
    pub fn tape(&self) -> &Tape { &self.tape }
    pub fn tape_mut(&mut self) -> &mut Tape { &mut self.tape }
    pub fn cursor(&self) -> &Cursor { &self.cursor }
    pub fn output(&self) -> &O { &self.output }
    pub fn output_mut(&mut self) -> &mut O { &mut self.output }
    pub fn input(&self) -> &I { &self.input }
    pub fn input_mut(&mut self) -> &mut I { &mut self.input }
    pub fn brackets(&self) -> BracketStrategy { self.brackets }

    /// Instructions executed since the last reset. A `,` that had to wait
    /// does not count.
    pub fn steps_executed(&self) -> u64 { self.steps }

    pub fn last_action(&self) -> Option<Action> { self.last_action }

    /// Execute exactly one instruction.
    ///
    /// Status side effects: an empty input queue parks the engine in
    /// `Waiting`; a successful step out of `Waiting` puts it back to
    /// `Running`; reaching end-of-stream while `Running` completes it.
    pub fn step(&mut self) -> StepOutcome {
        let Some(op) = self.cursor.current() else {
            self.last_action = Some(Action::EndOfStream);
            if self.status == Status::Running {
                self.set_status(Status::Complete);
            }
            return StepOutcome::Continue;
        };
        let ip = self.cursor.position();
        let mut jumped = false;

        let action = match op {
            '>' => {
                self.tape.move_forward();
                Action::MovePointer { to: self.tape.position() }
            }
            '<' => {
                self.tape.move_backward();
                Action::MovePointer { to: self.tape.position() }
            }
            '+' => {
                let from = self.tape.read();
                self.tape.increment();
                Action::Increment { at: self.tape.position(), from, to: self.tape.read() }
            }
            '-' => {
                let from = self.tape.read();
                self.tape.decrement();
                Action::Decrement { at: self.tape.position(), from, to: self.tape.read() }
            }
            '.' => {
                let value = self.tape.read();
                self.output.put(value);
                Action::Output { value }
            }
            ',' => match self.input.take() {
                Some(value) => {
                    self.tape.write(value);
                    Action::Input { value: self.tape.read() }
                }
                None => {
                    tracing::trace!(ip, "input queue empty");
                    self.last_action = Some(Action::AwaitInput);
                    self.set_status(Status::Waiting);
                    return StepOutcome::AwaitInput;
                }
            },
            '[' => {
                if self.tape.read() == 0 {
                    let to = self.landing_after_close(ip);
                    self.cursor.seek(to);
                    jumped = true;
                    Action::SkipLoop { to }
                } else {
                    Action::EnterLoop
                }
            }
            ']' => {
                if self.tape.read() != 0 {
                    let to = self.landing_after_open(ip);
                    self.cursor.seek(to);
                    jumped = true;
                    Action::JumpBack { to }
                } else {
                    Action::ExitLoop
                }
            }
            ch => Action::NoOp { ch },
        };

        if !jumped {
            self.cursor.advance(1);
        }
        self.steps += 1;
        self.last_action = Some(action);
        tracing::trace!(ip, op = %op, action = %action, "step");

        if self.status == Status::Waiting {
            self.set_status(Status::Running);
        }
        if self.status == Status::Running && self.cursor.is_at_end() {
            self.set_status(Status::Complete);
        }
        StepOutcome::Continue
    }

    /// Enter `Running`. A program that already ran off its end starts over
    /// from a blank tape; anything else resumes where it left off.
    pub fn start(&mut self) -> Status {
        if self.cursor.is_at_end() {
            self.reset();
        }
        self.set_status(Status::Running);
        self.status
    }

    /// Run until the program ends or blocks on input, then notify once.
    pub fn run(&mut self) -> Status {
        self.start();
        while self.status == Status::Running {
            if self.step() == StepOutcome::AwaitInput {
                break;
            }
        }
        self.notify();
        self.status
    }

    /// Like [`Engine::run`] but execute at most `limit` instructions. A
    /// program still going when the budget runs out is left `Paused`.
    pub fn run_steps(&mut self, limit: usize) -> Status {
        self.start();
        for _ in 0..limit {
            if self.status != Status::Running || self.step() == StepOutcome::AwaitInput {
                break;
            }
        }
        if self.status == Status::Running {
            self.set_status(Status::Paused);
        }
        self.notify();
        self.status
    }

    /// One host timer tick: step once if running or waiting, then notify.
    ///
    /// A waiting engine retries its `,`, so a host that pushes input can keep
    /// ticking. Returns the status so the host knows whether to keep
    /// scheduling.
    pub fn tick(&mut self) -> Status {
        if matches!(self.status, Status::Running | Status::Waiting) {
            self.step();
        }
        self.notify();
        self.status
    }

    /// Single-step for a debugger: execute one instruction, notify, and stay
    /// `Paused` unless the step finished the program or blocked on input.
    pub fn step_and_pause(&mut self) -> StepOutcome {
        self.set_status(Status::Running);
        let outcome = self.step();
        if self.status == Status::Running {
            self.set_status(Status::Paused);
        }
        self.notify();
        outcome
    }

    /// Halt a running or waiting program, keeping its state.
    pub fn pause(&mut self) {
        if matches!(self.status, Status::Running | Status::Waiting) {
            self.set_status(Status::Paused);
        }
    }

    pub fn stop(&mut self) {
        self.set_status(Status::Stopped);
    }

    /// Back to the freshly constructed state: stopped, blank tape, cursor at
    /// `0`. Output and pending input belong to the host and are left alone.
    pub fn reset(&mut self) {
        self.stop();
        self.tape.clear();
        self.cursor.rewind();
        self.steps = 0;
        self.last_action = None;
    }

    /// Replace the program and reset.
    pub fn reload(&mut self, code: &str) {
        self.cursor.reload(code);
        if self.brackets == BracketStrategy::Table {
            self.jumps = build_jump_table(self.cursor.as_chars());
        }
        self.reset();
    }

    fn set_status(&mut self, status: Status) {
        if self.status != status {
            tracing::debug!(from = %self.status, to = %status, ip = self.cursor.position(), "status");
            self.status = status;
        }
    }

    fn notify(&mut self) {
        if let Some(hook) = self.notify.as_mut() {
            let observation = Observation {
                status: self.status,
                ip: self.cursor.position(),
                steps: self.steps,
                action: self.last_action,
                tape: &self.tape,
            };
            hook(&observation);
        }
    }

    /// Position just past the `]` matching the `[` at `open`.
    fn landing_after_close(&self, open: usize) -> usize {
        match self.brackets {
            BracketStrategy::Table => self.jumps[open].unwrap_or(self.cursor.len()),
            BracketStrategy::Scan => {
                let chars = self.cursor.as_chars();
                let mut depth = 0usize;
                for (i, &c) in chars.iter().enumerate().skip(open) {
                    match c {
                        '[' => depth += 1,
                        ']' => {
                            depth -= 1;
                            if depth == 0 {
                                return i + 1;
                            }
                        }
                        _ => {}
                    }
                }
                // No partner: clamp to end-of-stream.
                chars.len()
            }
        }
    }

    /// Position just past the `[` matching the `]` at `close`.
    fn landing_after_open(&self, close: usize) -> usize {
        match self.brackets {
            BracketStrategy::Table => self.jumps[close].unwrap_or(0),
            BracketStrategy::Scan => {
                let chars = self.cursor.as_chars();
                let mut depth = 0usize;
                for i in (0..=close).rev() {
                    match chars[i] {
                        ']' => depth += 1,
                        '[' => {
                            depth -= 1;
                            if depth == 0 {
                                return i + 1;
                            }
                        }
                        _ => {}
                    }
                }
                // No partner: clamp to the start of the program.
                0
            }
        }
    }
}

/// Stack-match every bracket once. Unmatched `[` land at end-of-stream,
/// unmatched `]` land at `0`, the same places a depth scan gives up at.
fn build_jump_table(chars: &[char]) -> Vec<Option<usize>> {
    let mut jumps = vec![None; chars.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, &c) in chars.iter().enumerate() {
        if c == '[' {
            stack.push(i);
        } else if c == ']' {
            match stack.pop() {
                Some(open) => {
                    jumps[open] = Some(i + 1);
                    jumps[i] = Some(open + 1);
                }
                None => jumps[i] = Some(0),
            }
        }
    }
    for open in stack {
        jumps[open] = Some(chars.len());
    }
    jumps
}

impl<O, I> fmt::Debug for Engine<O, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("status", &self.status)
            .field("ip", &self.cursor.position())
            .field("len", &self.cursor.len())
            .field("ptr", &self.tape.position())
            .field("cell", &self.tape.read())
            .field("steps", &self.steps)
            .field("brackets", &self.brackets)
            .finish()
    }
}
