//! Console I/O used by `out` and `inp`.
//!
//! The interpreter is generic over [`Console`] so embedders and tests can
//! script input and capture output instead of touching the process streams.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait Console {
    /// Write `text` exactly as given.
    fn print(&mut self, text: &str) -> io::Result<()>;

    /// Show `prompt` (if the console prompts) and read one line without its
    /// terminator.  `Ok(None)` at end of input.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

fn strip_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

// ── StdConsole ────────────────────────────────────────────────────────────────

/// Process stdout/stdin.
#[derive(Debug, Default)]
pub struct StdConsole {
    prompt: bool,
}

impl StdConsole {
    pub fn new(prompt: bool) -> Self {
        StdConsole { prompt }
    }
}

impl Console for StdConsole {
    fn print(&mut self, text: &str) -> io::Result<()> {
        io::stdout().lock().write_all(text.as_bytes())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        if self.prompt {
            let mut out = io::stdout().lock();
            out.write_all(prompt.as_bytes())?;
            out.flush()?;
        }
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_terminator(line)))
    }
}

// ── BufferConsole ─────────────────────────────────────────────────────────────

/// In-memory console: scripted input lines, captured output and prompts.
#[derive(Debug, Default)]
pub struct BufferConsole {
    pub output: String,
    pub prompts: Vec<String>,
    input: VecDeque<String>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BufferConsole {
            input: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Captured output split into lines.
    pub fn lines(&self) -> Vec<&str> {
        self.output.lines().collect()
    }
}

impl Console for BufferConsole {
    fn print(&mut self, text: &str) -> io::Result<()> {
        self.output.push_str(text);
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.prompts.push(prompt.to_owned());
        Ok(self.input.pop_front())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
