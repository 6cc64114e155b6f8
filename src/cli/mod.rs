//! cli
//!
//! Command-line interface layer for jailsh.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and prepare the root directory
//! - Wire the session layer and the shell together, then hand over to the
//!   loop
//!
//! Startup failures end the process here with an error: a bad config, an
//! unusable root, or a working directory or credential file inside the root.
//! Nothing after the loop starts can.

pub mod args;

pub use args::{Cli, Command};

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::config::Config;
use crate::core::paths::PathGuard;
use crate::session::{CredentialStore, HttpAuthClient, SessionStore};
use crate::shell::{Shell, ShellContext, Tools};
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = cli.verbosity();

    match cli.command {
        Some(Command::Init { force }) => init(cli.config, force, verbosity),
        None => start(&cli, verbosity),
    }
}

/// Start the interactive shell.
fn start(cli: &Cli, verbosity: Verbosity) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    match config.loaded_from() {
        Some(path) => output::debug(format!("config: {}", path.display()), verbosity),
        None => output::debug("config: defaults", verbosity),
    }

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => config.root()?,
    };
    let guard = PathGuard::prepare(&root)
        .with_context(|| format!("cannot use root directory '{}'", root.display()))?;
    output::debug(format!("root: {}", guard.root().display()), verbosity);

    let working_dir = env::current_dir().context("cannot determine working directory")?;
    if guard.contains(&canonical_location(&working_dir)) {
        bail!(
            "working directory '{}' is inside the root; start jailsh from outside '{}'",
            working_dir.display(),
            guard.root().display()
        );
    }
    let credential_file = config.credential_file(&working_dir)?;
    if guard.contains(&canonical_location(&credential_file)) {
        bail!(
            "credential file '{}' must not be inside the root '{}'",
            credential_file.display(),
            guard.root().display()
        );
    }
    output::debug(
        format!("credential file: {}", credential_file.display()),
        verbosity,
    );

    let api = HttpAuthClient::new(
        config.login_url(),
        config.profile_url(),
        config.success_marker(),
        config.timeout(),
    )
    .context("failed to create HTTP client")?;
    let session = SessionStore::new(Box::new(api), CredentialStore::new(credential_file));

    let ctx = ShellContext::new(
        guard,
        working_dir,
        session,
        Tools::from_config(&config),
        verbosity,
    )?;

    let mut shell = Shell::new(ctx);
    shell.restore();
    shell.greet();
    shell.run()?;
    Ok(())
}

/// Canonical form of a path that may not exist yet: the deepest existing
/// ancestor is canonicalized and the rest appended.
fn canonical_location(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return rest.iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name);
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}

/// Write a starter config file.
fn init(path: Option<PathBuf>, force: bool, verbosity: Verbosity) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::global_config_path()?,
    };

    if path.exists() && !force {
        bail!(
            "config file '{}' already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::write_config_atomic(&path, &Config::starter())?;
    output::print(format!("Wrote {}", path.display()), verbosity);
    Ok(())
}
