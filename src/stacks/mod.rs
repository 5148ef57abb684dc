//! Unique stack traces across the threads of one process.
//!
//! Two traces are equivalent when their selected frames match position by
//! position. A frame matches on its original position and function name, and
//! also on its program counter unless the selection ignores PCs. Grouping
//! equivalent traces collapses a dump of hundreds of threads down to the
//! handful of distinct things they are doing.

use core::fmt;
use core::hash::{Hash, Hasher};

pub mod parse;
pub mod report;

pub use parse::parse_backtraces;
pub use report::{group_unique, render_report, StackGroup};

use crate::errors::ParseError;

/// Which frames of each backtrace take part in equivalence.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameSelection {
    /// Frames with a position below this are dropped.
    pub skip: usize,
    /// Highest position kept, inclusive. `None` keeps everything.
    pub limit: Option<usize>,
    /// Compare frames by position and name only.
    pub ignore_pc: bool,
}

impl FrameSelection {
    pub fn keeps(&self, position: usize) -> bool {
        position >= self.skip && self.limit.map_or(true, |limit| position <= limit)
    }
}

/// One frame of a thread's backtrace.
#[derive(Debug, Clone)]
pub struct Frame {
    position: usize,
    pc: Option<u64>,
    name: String,
    ignore_pc: bool,
}

impl Frame {
    /// A missing name is replaced by `[unknown <pc>]`.
    pub fn new(position: usize, pc: Option<u64>, name: Option<&str>, ignore_pc: bool) -> Self {
        let name = match (name, pc) {
            (Some(name), _) => name.to_string(),
            (None, Some(pc)) => format!("[unknown {pc:#x}]"),
            (None, None) => "[unknown]".to_string(),
        };
        Self {
            position,
            pc,
            name,
            ignore_pc,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn pc(&self) -> Option<u64> {
        self.pc
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        let same = self.position == other.position && self.name == other.name;
        if self.ignore_pc {
            return same;
        }
        same && self.pc == other.pc
    }
}

impl Eq for Frame {}

impl Hash for Frame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.hash(state);
        self.name.hash(state);
        if !self.ignore_pc {
            self.pc.hash(state);
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pc {
            Some(pc) if !self.ignore_pc => write!(f, "#{:3} {:#x} {}", self.position, pc, self.name),
            _ => write!(f, "#{:3} {}", self.position, self.name),
        }
    }
}

/// The selected frames of one thread, innermost first.
#[derive(Debug, Clone)]
pub struct StackTrace {
    /// Debugger-assigned thread number.
    pub thread: u32,
    /// Kernel thread id, when the dump names one.
    pub lwp: Option<u32>,
    pub frames: Vec<Frame>,
}

impl StackTrace {
    pub fn new(thread: u32, lwp: Option<u32>) -> Self {
        Self {
            thread,
            lwp,
            frames: Vec::new(),
        }
    }
}

// Equivalence ignores which thread the frames came from.
impl PartialEq for StackTrace {
    fn eq(&self, other: &Self) -> bool {
        self.frames == other.frames
    }
}

impl Eq for StackTrace {}

impl Hash for StackTrace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.frames.hash(state);
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{frame}")?;
        }
        Ok(())
    }
}

/// Parse a dump, group it, and render the report in one step.
pub fn render_unique_stacks(text: &str, selection: &FrameSelection) -> Result<String, ParseError> {
    let traces = parse_backtraces(text, selection)?;
    let thread_count = traces.len();
    let groups = group_unique(traces);
    Ok(render_report(&groups, thread_count))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_selection_bounds_are_inclusive() {
        let selection = FrameSelection {
            skip: 1,
            limit: Some(3),
            ignore_pc: false,
        };
        let kept: Vec<_> = (0..6).filter(|&p| selection.keeps(p)).collect();
        assert_eq!(kept, vec![1, 2, 3]);
        assert!(FrameSelection::default().keeps(usize::MAX));
    }

    #[test]
    fn test_unknown_frame_names() {
        assert_eq!(Frame::new(0, Some(0x40), None, false).name(), "[unknown 0x40]");
        assert_eq!(Frame::new(0, None, None, false).name(), "[unknown]");
    }

    #[test]
    fn test_pc_participates_unless_ignored() {
        let a = Frame::new(2, Some(0x1000), Some("sleep"), false);
        let b = Frame::new(2, Some(0x2000), Some("sleep"), false);
        assert_ne!(a, b);

        let a = Frame::new(2, Some(0x1000), Some("sleep"), true);
        let b = Frame::new(2, Some(0x2000), Some("sleep"), true);
        assert_eq!(a, b);
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_position_participates() {
        let a = Frame::new(0, Some(0x1000), Some("sleep"), true);
        let b = Frame::new(1, Some(0x1000), Some("sleep"), true);
        assert_ne!(a, b);
    }

    #[test]
    fn test_frame_display() {
        let frame = Frame::new(3, Some(0x7f00), Some("nanosleep"), false);
        assert_eq!(frame.to_string(), "#  3 0x7f00 nanosleep");
        let frame = Frame::new(12, Some(0x7f00), Some("nanosleep"), true);
        assert_eq!(frame.to_string(), "# 12 nanosleep");
        let frame = Frame::new(0, None, Some("inlined_helper"), false);
        assert_eq!(frame.to_string(), "#  0 inlined_helper");
    }

    #[test]
    fn test_trace_equality_ignores_thread() {
        let mut one = StackTrace::new(1, Some(100));
        let mut two = StackTrace::new(2, None);
        for trace in [&mut one, &mut two] {
            trace.frames.push(Frame::new(0, Some(0x10), Some("a"), false));
            trace.frames.push(Frame::new(1, Some(0x20), Some("b"), false));
        }
        assert_eq!(one, two);
        assert_eq!(one.to_string(), "#  0 0x10 a\n#  1 0x20 b");
    }
}
