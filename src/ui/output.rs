//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Everything the shell shows goes through here. Command output is always
//! printed; confirmations and notices respect the quiet flag; diagnostics
//! go to stderr.

use std::fmt::Display;
use std::io::{self, Write};

use crate::shell::reply::{Reply, Tone};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Quiet mode - command output and errors only
    Quiet,
    /// Normal mode - standard output
    #[default]
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print a debug message (only in debug mode).
pub fn debug(message: impl Display, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        eprintln!("[debug] {}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Render a command reply.
pub fn render(reply: &Reply, verbosity: Verbosity) {
    let mut stdout = io::stdout().lock();
    for line in reply.lines.iter().filter(|l| is_visible(l.tone, verbosity)) {
        // Control sequences must not be followed by a newline.
        let _ = match line.tone {
            Tone::Control => write!(stdout, "{}", line.text),
            _ => writeln!(stdout, "{}", line.text),
        };
    }
    let _ = stdout.flush();
}

/// Whether a line would be shown at this verbosity.
pub fn is_visible(tone: Tone, verbosity: Verbosity) -> bool {
    match tone {
        Tone::Plain | Tone::Control => true,
        Tone::Success | Tone::Notice => verbosity != Verbosity::Quiet,
    }
}
