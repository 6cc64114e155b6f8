//! shell::command
//!
//! Tokenizing input lines into typed commands.
//!
//! # Grammar
//!
//! A line is split with POSIX shell quoting rules, so `cat "my notes.txt"`
//! yields a single argument. The first token selects the [`Verb`]; the
//! two-token verb `git clone` is the only exception. Everything after the
//! verb is the argument list.
//!
//! Parsing never checks arity; handlers do, because the error message
//! depends on the verb.

use super::errors::ShellError;

/// The fixed set of shell verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Ls,
    Cd,
    Mkdir,
    Cat,
    Upload,
    Download,
    GitClone,
    Run,
    Install,
    Login,
    Logout,
    Clear,
    Help,
    Exit,
}

impl Verb {
    /// All verbs, in help-table order.
    pub const ALL: [Verb; 14] = [
        Verb::Ls,
        Verb::Cd,
        Verb::Mkdir,
        Verb::Cat,
        Verb::Upload,
        Verb::Download,
        Verb::GitClone,
        Verb::Run,
        Verb::Install,
        Verb::Login,
        Verb::Logout,
        Verb::Clear,
        Verb::Help,
        Verb::Exit,
    ];

    /// The word typed to invoke the verb.
    pub fn name(self) -> &'static str {
        match self {
            Verb::Ls => "ls",
            Verb::Cd => "cd",
            Verb::Mkdir => "mkdir",
            Verb::Cat => "cat",
            Verb::Upload => "upload",
            Verb::Download => "download",
            Verb::GitClone => "git clone",
            Verb::Run => "run",
            Verb::Install => "install",
            Verb::Login => "login",
            Verb::Logout => "logout",
            Verb::Clear => "clear",
            Verb::Help => "help",
            Verb::Exit => "exit",
        }
    }

    /// Usage line shown in help and usage errors.
    pub fn usage(self) -> &'static str {
        match self {
            Verb::Ls => "ls",
            Verb::Cd => "cd <folder>",
            Verb::Mkdir => "mkdir <folder>",
            Verb::Cat => "cat <file>",
            Verb::Upload => "upload <path>",
            Verb::Download => "download <file>",
            Verb::GitClone => "git clone <url>",
            Verb::Run => "run <script>",
            Verb::Install => "install <package>",
            Verb::Login => "login <username> <password>",
            Verb::Logout => "logout",
            Verb::Clear => "clear",
            Verb::Help => "help",
            Verb::Exit => "exit",
        }
    }

    /// One-line description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            Verb::Ls => "List files/folders in current directory",
            Verb::Cd => "Change directory",
            Verb::Mkdir => "Create new folder",
            Verb::Cat => "View contents of a file",
            Verb::Upload => "Copy file from outside into root",
            Verb::Download => "Copy file from root to outside",
            Verb::GitClone => "Clone a Git repo into current directory",
            Verb::Run => "Run a script inside root",
            Verb::Install => "Install a package with the package manager",
            Verb::Login => "Login to the remote account",
            Verb::Logout => "Logout and clear session",
            Verb::Clear => "Clear the terminal screen",
            Verb::Help => "Show this help message",
            Verb::Exit => "Exit the shell",
        }
    }

    fn from_tokens(tokens: &[String]) -> Option<(Verb, usize)> {
        let verb = match tokens.first()?.as_str() {
            "ls" => Verb::Ls,
            "cd" => Verb::Cd,
            "mkdir" => Verb::Mkdir,
            "cat" => Verb::Cat,
            "upload" => Verb::Upload,
            "download" => Verb::Download,
            "git" if tokens.get(1).map(String::as_str) == Some("clone") => {
                return Some((Verb::GitClone, 2))
            }
            "run" => Verb::Run,
            "install" => Verb::Install,
            "login" => Verb::Login,
            "logout" => Verb::Logout,
            "clear" => Verb::Clear,
            "help" => Verb::Help,
            "exit" => Verb::Exit,
            _ => return None,
        };
        Some((verb, 1))
    }
}

/// A parsed instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub args: Vec<String>,
}

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Nothing but whitespace.
    Blank,
    /// A recognized verb.
    Known(Command),
    /// An unrecognized verb; carries the raw line for echoing back.
    Unknown(String),
}

/// Parse one input line.
///
/// # Errors
///
/// [`ShellError::Usage`] if the quoting is unbalanced.
pub fn parse(line: &str) -> Result<Input, ShellError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Input::Blank);
    }

    let tokens = shell_words::split(trimmed)
        .map_err(|_| ShellError::Usage(format!("unbalanced quotes in '{}'", trimmed)))?;

    if tokens.is_empty() {
        return Ok(Input::Blank);
    }

    match Verb::from_tokens(&tokens) {
        Some((verb, consumed)) => Ok(Input::Known(Command {
            verb,
            args: tokens[consumed..].to_vec(),
        })),
        None => Ok(Input::Unknown(trimmed.to_string())),
    }
}

impl Command {
    /// Require that no arguments were given.
    pub fn expect_none(&self) -> Result<(), ShellError> {
        if self.args.is_empty() {
            Ok(())
        } else {
            Err(ShellError::Usage(self.verb.usage().to_string()))
        }
    }

    /// Require exactly one non-empty argument.
    pub fn expect_one(&self) -> Result<&str, ShellError> {
        match self.args.as_slice() {
            [] => Err(ShellError::MissingArgument(self.verb.usage().to_string())),
            [arg] if arg.trim().is_empty() => {
                Err(ShellError::MissingArgument(self.verb.usage().to_string()))
            }
            [arg] => Ok(arg),
            _ => Err(ShellError::Usage(format!(
                "{} (quote arguments that contain spaces)",
                self.verb.usage()
            ))),
        }
    }
}
