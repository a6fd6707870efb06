//! Subcommands of the `bf` reference host.

pub mod run;
pub mod tick;
pub mod trace;

use std::fs;
use std::io::{self, IsTerminal, Read, Write};

use clap::{Args, ValueEnum};

use crate::cli_util::print_error;
use crate::config::Settings;
use crate::engine::{BracketStrategy, Engine, EngineOptions};
use crate::error::EngineError;
use crate::host::{InputProvider, InputQueue, OutputSink};

/// Program source and machine shape, shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct ProgramArgs {
    /// Read program text from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Text queued as input (character codes). Without it, piped stdin is used.
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    /// Cell width in bits (fallback BF_BITS / bf.toml; default 8)
    #[arg(long = "bits", value_name = "N")]
    pub bits: Option<u32>,

    /// Use signed cells; `--signed=false` overrides BF_SIGNED / bf.toml
    #[arg(
        long = "signed",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub signed: Option<bool>,

    /// Precompute bracket jumps instead of scanning
    #[arg(long = "table")]
    pub table: bool,

    /// What to do when input runs out: keep waiting, or feed 0 like EOF
    #[arg(long = "eof", value_enum, default_value_t = EofPolicy::Wait)]
    pub eof: EofPolicy,

    /// Concatenated program parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,
}

/// Host reaction to a program blocked on `,` once all input is consumed.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Leave the program waiting and report it.
    #[default]
    Wait,
    /// Deliver `0` and keep going.
    Zero,
}

/// Why a subcommand could not get as far as running anything.
pub(crate) enum SetupError {
    /// Bad combination of arguments; the caller prints usage.
    Usage,
    /// Already reported to stderr; exit with this code.
    Exit(i32),
}

impl ProgramArgs {
    /// Resolve the program text from `--file` or the positional parts.
    pub(crate) fn source(&self, program: &str) -> Result<String, SetupError> {
        if self.file.is_none() && self.code.is_empty() {
            return Err(SetupError::Usage);
        }
        if self.file.is_some() && !self.code.is_empty() {
            print_error(&format!("{program}: cannot use positional code together with --file"));
            return Err(SetupError::Usage);
        }
        match &self.file {
            Some(path) => fs::read_to_string(path).map_err(|e| {
                print_error(&format!("{program}: failed to read code file as UTF-8: {e}"));
                SetupError::Exit(1)
            }),
            None => Ok(self.code.join("")),
        }
    }

    /// Flags -> env -> bf.toml -> defaults.
    pub(crate) fn engine_options(&self, settings: &Settings) -> Result<EngineOptions, EngineError> {
        let mut effective = settings.clone();
        if let Some(bits) = self.bits {
            effective.bits = bits;
        }
        if let Some(signed) = self.signed {
            effective.signed = signed;
        }
        if self.table {
            effective.brackets = BracketStrategy::Table;
        }
        effective.engine_options()
    }

    /// Everything the program may read: `--input` text, or piped stdin.
    pub(crate) fn initial_input(&self, program: &str) -> Result<InputQueue, SetupError> {
        let mut queue = InputQueue::new();
        if let Some(text) = &self.input {
            queue.push_text(text);
        } else if !io::stdin().is_terminal() {
            let mut buf = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buf) {
                print_error(&format!("{program}: failed reading UTF-8 from stdin: {e}"));
                return Err(SetupError::Exit(1));
            }
            queue.push_text(&buf);
        }
        Ok(queue)
    }
}

/// Build an engine from the arguments, reporting configuration problems.
pub(crate) fn build_engine<O, I>(
    program: &str,
    args: &ProgramArgs,
    settings: &Settings,
    code: &str,
    output: O,
    input: I,
) -> Result<Engine<O, I>, SetupError>
where
    O: OutputSink,
    I: InputProvider,
{
    match args.engine_options(settings) {
        Ok(options) => Ok(Engine::with_host(code, options, output, input)),
        Err(e) => {
            print_error(&format!("{program}: {e}"));
            Err(SetupError::Exit(2))
        }
    }
}

/// Print output values as characters without a trailing newline.
pub(crate) fn write_values(out: &mut impl Write, values: &[i64]) -> io::Result<()> {
    let text: String = values.iter().map(|&v| crate::host::code_to_char(v)).collect();
    out.write_all(text.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_settings() {
        let args = ProgramArgs { bits: Some(16), table: true, ..Default::default() };
        let settings = Settings::default();
        let opts = args.engine_options(&settings).unwrap();
        assert_eq!(opts.range.max(), 65_535);
        assert_eq!(opts.brackets, BracketStrategy::Table);
    }

    #[test]
    fn settings_fill_missing_flags() {
        let args = ProgramArgs::default();
        let settings = Settings { bits: 4, signed: true, ..Settings::default() };
        let opts = args.engine_options(&settings).unwrap();
        assert_eq!((opts.range.min(), opts.range.max()), (-8, 7));
    }

    #[test]
    fn unsigned_flag_beats_signed_settings() {
        let settings = Settings { signed: true, ..Settings::default() };
        let args = ProgramArgs { signed: Some(false), ..Default::default() };
        let opts = args.engine_options(&settings).unwrap();
        assert_eq!((opts.range.min(), opts.range.max()), (0, 255));

        let inherit = ProgramArgs::default();
        let opts = inherit.engine_options(&settings).unwrap();
        assert_eq!((opts.range.min(), opts.range.max()), (-128, 127));
    }

    #[test]
    fn source_requires_exactly_one_origin() {
        let none = ProgramArgs::default();
        assert!(matches!(none.source("bf"), Err(SetupError::Usage)));

        let both = ProgramArgs {
            file: Some("x.bf".into()),
            code: vec!["+".into()],
            ..Default::default()
        };
        assert!(matches!(both.source("bf"), Err(SetupError::Usage)));

        let parts = ProgramArgs { code: vec!["++".into(), "[-]".into()], ..Default::default() };
        assert_eq!(parts.source("bf").ok().as_deref(), Some("++[-]"));
    }

    #[test]
    fn input_flag_is_queued_as_codes() {
        let args = ProgramArgs { input: Some("ab".into()), ..Default::default() };
        let queue = args.initial_input("bf").ok().unwrap();
        assert_eq!(queue.iter().collect::<Vec<_>>(), vec![97, 98]);
    }
}
