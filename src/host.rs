//! Collaborators the engine talks to: where output goes, where input comes
//! from, and what the notify hook gets to see.

use std::collections::VecDeque;

use crate::engine::{Action, Status};
use crate::tape::Tape;

/// Receives every value printed by `.`.
pub trait OutputSink {
    fn put(&mut self, value: i64);
}

/// Supplies values for `,`. `None` means nothing is queued yet; the engine
/// suspends and retries the same instruction later.
pub trait InputProvider {
    fn take(&mut self) -> Option<i64>;
}

impl<F: FnMut(i64)> OutputSink for F {
    fn put(&mut self, value: i64) {
        self(value)
    }
}

impl<F: FnMut() -> Option<i64>> InputProvider for F {
    fn take(&mut self) -> Option<i64> {
        self()
    }
}

/// Append-only record of program output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLog {
    values: Vec<i64>,
}

impl OutputLog {
    pub fn new() -> Self { Self::default() }

    pub fn values(&self) -> &[i64] { &self.values }
    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Output read as character codes. Values that are not valid scalar
    /// values render as U+FFFD.
    pub fn to_text(&self) -> String {
        self.values.iter().map(|&v| code_to_char(v)).collect()
    }

    /// Hand the collected values to the caller, leaving the log empty.
    pub fn take(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.values)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl OutputSink for OutputLog {
    fn put(&mut self, value: i64) {
        self.values.push(value);
    }
}

/// FIFO of pending input values, filled by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputQueue {
    pending: VecDeque<i64>,
}

impl InputQueue {
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, value: i64) {
        self.pending.push_back(value);
    }

    /// Queue each character of `text` as its code point.
    pub fn push_text(&mut self, text: &str) {
        self.pending.extend(text.chars().map(|c| c as i64));
    }

    pub fn len(&self) -> usize { self.pending.len() }
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    /// Pending values, next one first.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.pending.iter().copied()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl Extend<i64> for InputQueue {
    fn extend<T: IntoIterator<Item = i64>>(&mut self, iter: T) {
        self.pending.extend(iter);
    }
}

impl InputProvider for InputQueue {
    fn take(&mut self) -> Option<i64> {
        self.pending.pop_front()
    }
}

/// What the notify hook sees after the engine changed state.
///
/// The hook carries no obligation beyond "state changed, re-read it"; this
/// is the state worth re-reading.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub status: Status,
    /// Program position after the step.
    pub ip: usize,
    /// Steps executed since the last reset.
    pub steps: u64,
    pub action: Option<Action>,
    pub tape: &'a Tape,
}

pub(crate) fn code_to_char(value: i64) -> char {
    u32::try_from(value)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_is_fifo() {
        let mut q = InputQueue::new();
        q.push(1);
        q.extend([2, 3]);
        assert_eq!(q.take(), Some(1));
        assert_eq!(q.take(), Some(2));
        assert_eq!(q.take(), Some(3));
        assert_eq!(q.take(), None);
    }

    #[test]
    fn push_text_queues_code_points() {
        let mut q = InputQueue::new();
        q.push_text("Hi");
        assert_eq!(q.iter().collect::<Vec<_>>(), vec![72, 105]);
    }

    #[test]
    fn output_log_renders_text() {
        let mut out = OutputLog::new();
        for v in [72, 105, -1] {
            out.put(v);
        }
        assert_eq!(out.values(), &[72, 105, -1]);
        assert_eq!(out.to_text(), "Hi\u{FFFD}");
        assert_eq!(out.take(), vec![72, 105, -1]);
        assert!(out.is_empty());
    }

    #[test]
    fn closures_act_as_collaborators() {
        let mut seen = Vec::new();
        {
            let mut sink = |v: i64| seen.push(v);
            sink.put(5);
        }
        assert_eq!(seen, vec![5]);

        let mut n = 0;
        let mut src = || {
            n += 1;
            (n <= 1).then_some(42)
        };
        assert_eq!(src.take(), Some(42));
        assert_eq!(src.take(), None);
    }
}
