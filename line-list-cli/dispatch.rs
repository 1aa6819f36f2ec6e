//! The interactive opcode loop.
//!
//! Commands arrive as whitespace-separated tokens: an integer opcode
//! followed by the argument shape that operation expects. Queries
//! print their result on its own line; mutations print nothing.
//!
//! | opcode | arguments        | operation                          |
//! |--------|------------------|------------------------------------|
//! | 1      | count, n words   | append each word                   |
//! | 2      | index, word      | insert word at index               |
//! | 3      | —                | print all lines, space-separated   |
//! | 4      | —                | print the size                     |
//! | 5      | index            | print the line at index            |
//! | 6      | —                | print the total character length   |
//! | 7      | word             | print how many lines equal word    |
//! | 8      | word             | remove every line equal to word    |
//! | 9      | index            | remove the line at index           |
//! | 10     | —                | reverse                            |
//! | 11     | —                | clear                              |
//! | 12     | —                | sort ascending                     |
//! | 13     | —                | print whether the list is sorted   |
//! | 0      | —                | exit                               |
//!
//! Anything else prints `Invalid choice`. Out-of-range and negative
//! indices are silent no-ops, matching the list's own contract.

use std::{
  collections::VecDeque,
  io::{self, BufRead, Write},
};

use line_list::LineList;

/// Reads opcodes from `input` until opcode 0 or end of input, writing
/// results to `out`.
pub fn run<R: BufRead, W: Write>(input: R, mut out: W) -> io::Result<()> {
  let mut tokens = Tokens::new(input);
  let mut list = LineList::new();

  loop {
    let Some(token) = tokens.next_token()? else {
      // Input closed without an explicit exit opcode.
      break;
    };
    let Ok(opcode) = token.parse::<i64>() else {
      writeln!(out, "Invalid choice")?;
      continue;
    };
    log::debug!("dispatching opcode {opcode}");

    match opcode {
      1 => {
        let Some(count) = tokens.next_integer()? else {
          continue;
        };
        for _ in 0..count.max(0) {
          match tokens.next_token()? {
            Some(word) => list.push_back(word),
            None => break,
          }
        }
      },
      2 => {
        let Some(index) = tokens.next_integer()? else {
          continue;
        };
        let Some(word) = tokens.next_token()? else {
          continue;
        };
        // Negative positions fall through to the same silent no-op as
        // any other out-of-range index.
        if let Ok(index) = usize::try_from(index) {
          list.insert_at(word, index);
        }
      },
      3 => writeln!(out, "{list}")?,
      4 => writeln!(out, "{}", list.len())?,
      5 => {
        let Some(index) = tokens.next_integer()? else {
          continue;
        };
        if let Some(line) = usize::try_from(index).ok().and_then(|i| list.get(i)) {
          writeln!(out, "{line}")?;
        }
      },
      6 => writeln!(out, "{}", list.total_len())?,
      7 => {
        let Some(word) = tokens.next_token()? else {
          continue;
        };
        writeln!(out, "{}", list.count(&word))?;
      },
      8 => {
        let Some(word) = tokens.next_token()? else {
          continue;
        };
        let removed = list.remove_all(&word);
        log::debug!("removed {removed} occurrences of {word:?}");
      },
      9 => {
        let Some(index) = tokens.next_integer()? else {
          continue;
        };
        if let Ok(index) = usize::try_from(index) {
          list.remove_at(index);
        }
      },
      10 => list.reverse(),
      11 => list.clear(),
      12 => list.sort(),
      13 => writeln!(out, "{}", list.is_sorted())?,
      0 => break,
      _ => writeln!(out, "Invalid choice")?,
    }
  }

  Ok(())
}

/// Splits a buffered reader into whitespace-separated tokens, reading
/// lines lazily so the loop stays interactive.
struct Tokens<R> {
  input:   R,
  pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
  fn new(input: R) -> Self {
    Self {
      input,
      pending: VecDeque::new(),
    }
  }

  /// Next token, or `None` at end of input.
  fn next_token(&mut self) -> io::Result<Option<String>> {
    loop {
      if let Some(token) = self.pending.pop_front() {
        return Ok(Some(token));
      }
      let mut line = String::new();
      if self.input.read_line(&mut line)? == 0 {
        return Ok(None);
      }
      self
        .pending
        .extend(line.split_whitespace().map(str::to_string));
    }
  }

  /// Next token parsed as an integer. A malformed token is logged and
  /// yields `None` like end of input; the caller abandons the current
  /// command either way.
  fn next_integer(&mut self) -> io::Result<Option<i64>> {
    let Some(token) = self.next_token()? else {
      return Ok(None);
    };
    match token.parse() {
      Ok(value) => Ok(Some(value)),
      Err(_) => {
        log::warn!("expected an integer argument, got {token:?}");
        Ok(None)
      },
    }
  }
}
