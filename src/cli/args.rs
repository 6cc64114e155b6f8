//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of searching
//! - `--root <path>`: Override the configured root directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::ui::output::Verbosity;

/// jailsh - an interactive shell confined to one directory
#[derive(Parser, Debug)]
#[command(name = "jailsh")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use (skips the standard search)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root directory, overriding the config file
    #[arg(long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output: hide confirmations, notices and the banner
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Start the shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Verbosity selected by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// Available commands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Write a config file with every default spelled out
    #[command(
        name = "init",
        after_help = "\
The file is written to --config if given, otherwise to ~/.jailsh/config.toml."
    )]
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_starts_shell() {
        let cli = Cli::try_parse_from(["jailsh"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn global_flags() {
        let cli =
            Cli::try_parse_from(["jailsh", "--config", "/etc/j.toml", "--root", "/srv/j", "--debug"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/etc/j.toml")));
        assert_eq!(cli.root, Some(PathBuf::from("/srv/j")));
        assert_eq!(cli.verbosity(), Verbosity::Debug);
    }

    #[test]
    fn quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["jailsh", "-q", "--debug"]).is_err());
    }

    #[test]
    fn init_subcommand() {
        let cli = Cli::try_parse_from(["jailsh", "init", "--force"]).unwrap();
        assert_eq!(cli.command, Some(Command::Init { force: true }));
    }
}
