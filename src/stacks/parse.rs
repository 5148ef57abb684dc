//! Reader for the text a debugger prints for `thread apply all bt`.
//!
//! ```text
//! Thread 2 (Thread 0x7ffff77ff6c0 (LWP 4812) "idle-a-0"):
//! #0  0x00007ffff7e5a3bf in clock_nanosleep () from /lib/libc.so.6
//! #1  0x00005555555604a2 in std::thread::sleep (dur=...) at library/std/src/thread/mod.rs:874
//! #2  uniq_stacks::idle::idle_a (tick=...) at src/idle.rs:44
//! ```
//!
//! Only header and frame lines are interpreted. Wrapped argument lists,
//! `Backtrace stopped` notes and other debugger chatter are skipped.

use super::{Frame, FrameSelection, StackTrace};
use crate::errors::ParseError;

/// Parse every thread's backtrace, keeping the frames `selection` allows.
///
/// Threads are returned in the order they appear in `text`. When threads are
/// qualified as `inferior.thread`, only the first inferior in the dump is
/// kept; thread numbers are only unique within one inferior.
pub fn parse_backtraces(text: &str, selection: &FrameSelection) -> Result<Vec<StackTrace>, ParseError> {
    let mut traces = Vec::new();
    let mut current: Option<StackTrace> = None;
    let mut first_inferior: Option<u32> = None;
    let mut skipping = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix("Thread ") {
            if let Some(header) = parse_header(rest, line)? {
                traces.extend(current.take());
                skipping = header
                    .inferior
                    .is_some_and(|inferior| *first_inferior.get_or_insert(inferior) != inferior);
                if !skipping {
                    current = Some(header.trace);
                }
            }
            continue;
        }

        if trimmed.starts_with('#') {
            if skipping {
                continue;
            }
            let trace = current
                .as_mut()
                .ok_or(ParseError::FrameOutsideThread { line })?;
            let frame = parse_frame(trimmed, line, selection.ignore_pc)?;
            if selection.keeps(frame.position()) {
                trace.frames.push(frame);
            }
        }
    }

    traces.extend(current);
    Ok(traces)
}

struct Header {
    inferior: Option<u32>,
    trace: StackTrace,
}

/// `rest` is the header with the leading `Thread ` removed. Lines that merely
/// start with the word (e.g. `Thread debugging using libthread_db enabled`)
/// yield `None`.
fn parse_header(rest: &str, line: usize) -> Result<Option<Header>, ParseError> {
    let Some((number, details)) = rest.split_once(' ') else {
        return Ok(None);
    };
    if !details.starts_with('(') {
        return Ok(None);
    }

    let bad_number = || ParseError::BadThreadNumber {
        line,
        text: number.to_string(),
    };
    // Multi-inferior sessions qualify the number as `inferior.thread`.
    let (inferior, local) = match number.split_once('.') {
        Some((inferior, local)) => (Some(inferior.parse::<u32>().map_err(|_| bad_number())?), local),
        None => (None, number),
    };
    let thread = local.parse::<u32>().map_err(|_| bad_number())?;

    Ok(Some(Header {
        inferior,
        trace: StackTrace::new(thread, parse_lwp(details)),
    }))
}

fn parse_lwp(details: &str) -> Option<u32> {
    let start = details.find("LWP ")? + "LWP ".len();
    let digits: &str = &details[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok()
}

fn parse_frame(line_text: &str, line: usize, ignore_pc: bool) -> Result<Frame, ParseError> {
    let body = &line_text[1..];
    let (index, rest) = body.split_once(char::is_whitespace).unwrap_or((body, ""));
    let position = index.parse::<usize>().map_err(|_| ParseError::BadFrameIndex {
        line,
        text: format!("#{index}"),
    })?;

    let mut rest = rest.trim_start();
    let mut pc = None;
    if rest.starts_with("0x") {
        let (addr, after) = rest.split_once(' ').unwrap_or((rest, ""));
        let value = u64::from_str_radix(&addr[2..], 16).map_err(|_| ParseError::BadProgramCounter {
            line,
            text: addr.to_string(),
        })?;
        pc = Some(value);
        rest = after.trim_start();
        rest = rest.strip_prefix("in ").unwrap_or(rest);
    }

    let name = function_name(rest);
    let name = match name {
        "" | "??" => None,
        name => Some(name),
    };
    Ok(Frame::new(position, pc, name, ignore_pc))
}

/// Everything before the argument list, which opens at the first ` (` that
/// sits outside template brackets. `std::function<void (int)>::operator()`
/// keeps its inner ` (`. Angle brackets that belong to an operator name
/// (`operator<<`, `operator>=`, `->`) do not open or close a bracket.
fn function_name(rest: &str) -> &str {
    let bytes = rest.as_bytes();
    let mut depth = 0usize;
    let mut first_paren = None;
    for (i, &byte) in bytes.iter().enumerate() {
        let prev = i.checked_sub(1).map(|p| bytes[p]);
        match byte {
            b'<' | b'>' if is_operator_bracket(&rest[..i]) => {}
            b'>' if prev == Some(b'-') => {}
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b'(' if prev == Some(b' ') => {
                if depth == 0 {
                    return rest[..i - 1].trim_end();
                }
                first_paren.get_or_insert(i);
            }
            _ => {}
        }
    }
    // Unbalanced brackets: fall back to the first ` (` anywhere.
    match first_paren {
        Some(i) => rest[..i - 1].trim_end(),
        None => strip_location(rest),
    }
}

/// Whether the `<` or `>` following `before` spells part of `operator<`,
/// `operator<<`, `operator<=>`, `operator>>=` and friends.
fn is_operator_bracket(before: &str) -> bool {
    let stem = before.trim_end_matches(['<', '>', '=']);
    stem.ends_with("operator") && before.len() - stem.len() <= 2
}

/// Frames without an argument list can still carry ` at file:line` or
/// ` from lib`.
fn strip_location(rest: &str) -> &str {
    let end = [" at ", " from "]
        .iter()
        .filter_map(|marker| rest.find(marker))
        .min()
        .unwrap_or(rest.len());
    rest[..end].trim_end()
}
