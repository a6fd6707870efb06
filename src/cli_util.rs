use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Style;

use crate::config;
use crate::tape::Tape;
use crate::theme::Colors;

/// Message colors for stderr, only when stderr is a terminal.
fn stderr_colors() -> Option<&'static Colors> {
    io::stderr().is_terminal().then(|| &config::settings().colors)
}

/// Print a one-line failure message, in the error color on a terminal.
pub fn print_error(message: &str) {
    match stderr_colors() {
        Some(c) => eprintln!("{}", Style::new().fg(c.error).paint(message)),
        None => eprintln!("{message}"),
    }
    let _ = io::stderr().flush();
}

/// Report a program blocked on `,` with a caret under the instruction.
pub fn print_waiting_with_context(program: &str, code: &str, pos: usize) {
    let style = stderr_colors().map(|c| Style::new().fg(c.waiting).bold());
    let prefix = format!("{program}: program is waiting for input");
    eprint!("{}", error_with_context(&prefix, code, pos, style));
    let _ = io::stderr().flush();
}

/// Message with instruction index and a caret context window, working with
/// UTF-8 by slicing using char indices. `style` paints the headline and caret.
pub fn error_with_context(prefix: &str, code: &str, pos: usize, style: Option<Style>) -> String {
    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);
    // Newlines inside the window would break the caret alignment.
    let slice: String = code[start_byte..end_byte]
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    let underline = format!("{}^", " ".repeat(caret_offset_chars));

    let headline = format!("{prefix} at instruction {pos}");
    let (headline, underline) = match style {
        Some(st) => (st.paint(headline).to_string(), st.paint(underline).to_string()),
        None => (headline, underline),
    };
    format!("{headline}\n  {slice}\n  {underline}\n")
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(byte_idx, _)| byte_idx)
        .unwrap_or(s.len())
}

/// One-line view of the cells around the data pointer, e.g.
/// `[-1]0 [0]>72< [1]0`. Styled when `colors` is given.
pub fn render_tape_window(tape: &Tape, radius: usize, colors: Option<&Colors>) -> String {
    let ptr = tape.position();
    tape.window(radius)
        .into_iter()
        .map(|cell| {
            let text = if cell.index == ptr {
                format!(">{}<", cell.value)
            } else {
                cell.value.to_string()
            };
            let text = match colors {
                Some(c) if cell.index == ptr => c.pointer().paint(text).to_string(),
                Some(c) => c.cell(cell.value).paint(text).to_string(),
                None => text,
            };
            format!("[{}]{}", cell.index, text)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
