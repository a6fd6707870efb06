//! A step-driven virtual machine for the eight-operator tape language
//! (`> < + - . , [ ]`), built to sit underneath interactive visualizers.
//!
//! Features and behaviors:
//! - Tape cells are bounded integers with a configurable bit width and
//!   signedness (8-bit unsigned by default); `+` and `-` wrap at the bounds.
//! - The tape is unbounded in both directions and allocated lazily.
//! - Any character outside the instruction set is a comment and costs one step.
//! - `,` never blocks: with no input queued the engine reports
//!   [`StepOutcome::AwaitInput`], parks in [`Status::Waiting`], and retries
//!   the same instruction once the host pushes input.
//! - Unbalanced brackets are not an error; jumps clamp at the program bounds.
//! - Timed execution belongs to the host, which calls [`Engine::tick`] on its
//!   own schedule.
//!
//! Quick start:
//!
//! ```
//! use bf::{Engine, Status};
//!
//! let mut vm = Engine::new(",[.-]");
//! assert_eq!(vm.run(), Status::Waiting);
//!
//! vm.input_mut().push(3);
//! assert_eq!(vm.run(), Status::Complete);
//! assert_eq!(vm.output().values(), &[3, 2, 1]);
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod host;
pub mod tape;
pub mod theme;

pub use cursor::Cursor;
pub use engine::{Action, BracketStrategy, Engine, EngineOptions, Status, StepOutcome};
pub use error::EngineError;
pub use host::{InputProvider, InputQueue, Observation, OutputLog, OutputSink};
pub use tape::{CellRange, CellView, Tape};
