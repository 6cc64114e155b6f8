//! shell::reply
//!
//! The output of one command, before rendering.
//!
//! Handlers never print. They return a [`Reply`] and the loop decides how
//! to show it, which keeps every handler testable without capturing stdout.

/// How a line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Command output, printed as-is.
    Plain,
    /// Confirmation of a completed action.
    Success,
    /// Informational note (e.g. "Already logged in.").
    Notice,
    /// Raw terminal control sequence; never suppressed by quiet mode.
    Control,
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub tone: Tone,
    pub text: String,
}

/// Whether the loop keeps reading after this command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    Continue,
    Exit,
}

/// Output of a command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<Line>,
    pub flow: Flow,
}

impl Reply {
    /// A reply with no output.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A reply that ends the session loop.
    pub fn exit() -> Self {
        Self {
            lines: Vec::new(),
            flow: Flow::Exit,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::empty().line(Tone::Plain, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::empty().line(Tone::Success, text)
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self::empty().line(Tone::Notice, text)
    }

    /// Append a line.
    pub fn line(mut self, tone: Tone, text: impl Into<String>) -> Self {
        self.lines.push(Line {
            tone,
            text: text.into(),
        });
        self
    }

    /// Append every line of another reply.
    pub fn extend(mut self, other: Reply) -> Self {
        self.lines.extend(other.lines);
        self
    }

    /// All line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_exit(&self) -> bool {
        self.flow == Flow::Exit
    }
}
