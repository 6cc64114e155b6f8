//! shell::repl
//!
//! The read-eval-print loop.
//!
//! # Input sources
//!
//! With a terminal on stdin, `rustyline` provides editing, history and verb
//! completion; Ctrl-C abandons the current line and Ctrl-D exits. Otherwise
//! lines are read straight from the reader, without a prompt, so sessions
//! can be scripted. End of input always behaves like `exit`.
//!
//! # Error policy
//!
//! A failed command is rendered as one `error:` line and the loop carries
//! on. Bytes that are not UTF-8 are decoded lossily in scripts and reported
//! in the editor. Only the input source itself failing ends the loop with an
//! error.

use std::io::{self, BufRead, IsTerminal};

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::ui::{banner, output};

use super::command::Verb;
use super::commands::{self, status_reply};
use super::context::ShellContext;
use super::errors::ShellError;
use super::reply::Flow;

/// An interactive shell over one [`ShellContext`].
#[derive(Debug)]
pub struct Shell {
    ctx: ShellContext,
}

impl Shell {
    pub fn new(ctx: ShellContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ShellContext {
        &self.ctx
    }

    /// Try to pick up a persisted session. Failure leaves the shell locked.
    pub fn restore(&mut self) {
        match self.ctx.try_restore() {
            Ok(profile) => output::debug(
                format!("restored session for {}", profile.username),
                self.ctx.verbosity,
            ),
            Err(e) => output::debug(format!("no session restored: {}", e), self.ctx.verbosity),
        }
    }

    /// Print the header and the status panel.
    pub fn greet(&self) {
        output::print(
            banner::header(&self.ctx.guard().root().display().to_string()),
            self.ctx.verbosity,
        );
        output::render(&status_reply(&self.ctx), self.ctx.verbosity);
    }

    /// Run one line and render its outcome.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match commands::execute(&mut self.ctx, line) {
            Ok(reply) => {
                output::render(&reply, self.ctx.verbosity);
                reply.flow
            }
            Err(e) => {
                output::error(&e);
                Flow::Continue
            }
        }
    }

    /// Run until `exit` or end of input, reading from stdin.
    pub fn run(&mut self) -> Result<(), ShellError> {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            self.run_interactive()
        } else {
            self.run_script(stdin.lock())
        }
    }

    /// Run lines from a reader until `exit` or end of input.
    pub fn run_script<R: BufRead>(&mut self, mut reader: R) -> Result<(), ShellError> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ShellError::Io {
                    context: "failed to read input".to_string(),
                    source,
                })?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if self.handle_line(line) == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    fn run_interactive(&mut self) -> Result<(), ShellError> {
        let mut editor: Editor<VerbHelper, DefaultHistory> =
            Editor::new().map_err(editor_error)?;
        editor.set_helper(Some(VerbHelper));

        loop {
            match editor.readline(&self.ctx.prompt()) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = editor.add_history_entry(line.as_str());
                    }
                    if self.handle_line(&line) == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                    output::error(format!("input is not valid UTF-8: {}", e));
                }
                Err(e) => return Err(editor_error(e)),
            }
        }
        Ok(())
    }
}

fn editor_error(err: ReadlineError) -> ShellError {
    ShellError::Io {
        context: "line editor failed".to_string(),
        source: match err {
            ReadlineError::Io(e) => e,
            other => io::Error::other(other.to_string()),
        },
    }
}

/// Completes and hints verb names at the start of the line.
struct VerbHelper;

impl VerbHelper {
    fn candidates(prefix: &str) -> impl Iterator<Item = &'static str> + '_ {
        Verb::ALL
            .iter()
            .map(|v| v.name())
            .filter(move |name| name.starts_with(prefix))
    }
}

impl Helper for VerbHelper {}

impl Completer for VerbHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') && !line.starts_with("git") {
            return Ok((0, Vec::new()));
        }

        let candidates = Self::candidates(line)
            .map(|name| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Hinter for VerbHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        Self::candidates(line)
            .find(|name| name.len() > line.len())
            .map(|name| name[line.len()..].to_string())
    }
}

impl Highlighter for VerbHelper {}

impl Validator for VerbHelper {}
