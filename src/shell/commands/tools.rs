//! shell::commands::tools
//!
//! `git clone`, `run` and `install`: commands that hand off to an external
//! program.
//!
//! # Confinement
//!
//! Programs start with the current location as their working directory and
//! with stdin closed, so they cannot consume the shell's own input. What
//! they do after that is outside the shell's control.

use std::io;
use std::path::Path;
use std::process::{Command as Process, Output, Stdio};

use crate::shell::command::Command;
use crate::shell::context::ShellContext;
use crate::shell::errors::ShellError;
use crate::shell::reply::{Reply, Tone};
use crate::ui::output;

use super::fs::deny_debug;

/// Clone a repository into the current location.
pub fn git_clone(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let url = cmd.expect_one()?;
    if url.starts_with('-') {
        return Err(ShellError::Usage(format!(
            "{} (the url may not start with '-')",
            cmd.verb.usage()
        )));
    }

    // The location may have been swapped for a symlink since `cd`.
    let cwd = ctx.resolve("")?;
    let output = spawn(ctx, "git clone", &ctx.tools.git, ["clone", "--", url], &cwd)?;

    if !output.status.success() {
        return Err(ShellError::ExternalTool {
            tool: "git clone".to_string(),
            message: failure_text(&output),
        });
    }
    Ok(Reply::success(format!("Cloned {}", url)))
}

/// Run a script with the interpreter registered for its extension.
///
/// A non-zero exit is not an error: the script's output and exit status
/// are shown and the shell carries on.
pub fn run(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let name = cmd.expect_one()?;
    let script = ctx.resolve(name).inspect_err(|e| deny_debug(ctx, e))?;

    if !script.exists() {
        return Err(ShellError::NotFound(name.to_string()));
    }
    if script.is_dir() {
        return Err(ShellError::IsADirectory(name.to_string()));
    }

    let interpreter = ctx
        .tools
        .interpreter_for(&script)
        .ok_or_else(|| ShellError::WrongExtension {
            name: name.to_string(),
            expected: ctx.tools.known_extensions(),
        })?;

    let output = spawn(ctx, "run", interpreter, [script.as_os_str()], ctx.cwd())?;

    let mut reply = Reply::empty();
    for stream in [&output.stdout, &output.stderr] {
        let text = String::from_utf8_lossy(stream);
        for line in text.lines() {
            reply = reply.line(Tone::Plain, line);
        }
    }

    if !output.status.success() {
        let status = output
            .status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        reply = reply.line(Tone::Notice, format!("'{}' exited with status {}", name, status));
    }
    Ok(reply)
}

/// Install a package with the configured package manager.
pub fn install(ctx: &mut ShellContext, cmd: &Command) -> Result<Reply, ShellError> {
    let package = cmd.expect_one()?;
    if package.starts_with('-') {
        return Err(ShellError::Usage(format!(
            "{} (the package may not start with '-')",
            cmd.verb.usage()
        )));
    }

    let (program, prefix) = ctx
        .tools
        .install
        .split_first()
        .ok_or_else(|| ShellError::ExternalTool {
            tool: "install".to_string(),
            message: "no package manager configured".to_string(),
        })?;

    let mut args: Vec<&str> = prefix.iter().map(String::as_str).collect();
    args.push(package);
    let output = spawn(ctx, "install", program, args, ctx.cwd())?;

    if !output.status.success() {
        return Err(ShellError::ExternalTool {
            tool: "install".to_string(),
            message: failure_text(&output),
        });
    }
    Ok(Reply::success(format!("Installed {}", package)))
}

fn spawn<I, S>(
    ctx: &ShellContext,
    tool: &str,
    program: &str,
    args: I,
    cwd: &Path,
) -> Result<Output, ShellError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    let mut process = Process::new(program);
    process
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    output::debug(format!("exec {:?} in {}", process, ctx.location()), ctx.verbosity);

    process.output().map_err(|e| ShellError::ExternalTool {
        tool: tool.to_string(),
        message: match e.kind() {
            io::ErrorKind::NotFound => format!("'{}' is not installed", program),
            _ => e.to_string(),
        },
    })
}

/// The tool's stderr, or a status line when it printed nothing.
fn failure_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        match output.status.code() {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::Fixture;
    use super::*;
    use crate::shell::context::Tools;
    use std::fs;
    use tempfile::TempDir;

    fn with_tools(tools: Tools) -> (TempDir, ShellContext) {
        let temp = TempDir::new().unwrap();
        let api = crate::session::mock::MockAuthApi::new().with_user("alice", "pw", None);
        let mut ctx = Fixture::context(temp.path(), &api, tools);
        ctx.login("alice", "pw").expect("login");
        (temp, ctx)
    }

    fn exec(ctx: &mut ShellContext, line: &str) -> Result<Reply, ShellError> {
        super::super::execute(ctx, line)
    }

    #[test]
    fn run_shell_script_in_current_location() {
        let mut fx = Fixture::authenticated();
        fs::create_dir(fx.root().join("work")).unwrap();
        fs::write(fx.root().join("work/hello.sh"), "echo hello\npwd\n").unwrap();
        fx.run("cd work").unwrap();

        let reply = fx.run("run hello.sh").expect("run");

        assert_eq!(reply.lines[0].text, "hello");
        assert!(reply.lines[1].text.ends_with("/work"));
    }

    #[test]
    fn run_reports_stderr_and_exit_status() {
        let mut fx = Fixture::authenticated();
        fs::write(fx.root().join("fail.sh"), "echo oops >&2\nexit 3\n").unwrap();

        let reply = fx.run("run fail.sh").expect("run is not an error");

        assert!(reply.text().contains("oops"));
        assert_eq!(reply.lines.last().unwrap().tone, Tone::Notice);
        assert!(reply.text().contains("status 3"));
    }

    #[test]
    fn run_wrong_extension() {
        let mut fx = Fixture::authenticated();
        fs::write(fx.root().join("notes.txt"), "").unwrap();
        let err = fx.run("run notes.txt").unwrap_err();
        assert!(matches!(err, ShellError::WrongExtension { .. }));
        assert!(err.to_string().contains(".py"));
    }

    #[test]
    fn run_missing_script() {
        let mut fx = Fixture::authenticated();
        assert!(matches!(
            fx.run("run ghost.py").unwrap_err(),
            ShellError::NotFound(_)
        ));
    }

    #[test]
    fn run_outside_root_is_denied() {
        let mut fx = Fixture::authenticated();
        fs::write(fx.outside().join("x.sh"), "echo pwned").unwrap();
        assert!(fx.run("run ../outside/x.sh").unwrap_err().is_access_denied());
    }

    #[test]
    fn run_missing_interpreter_is_external_tool_error() {
        let mut tools = Tools::default();
        tools
            .interpreters
            .insert("zz".into(), "jailsh-no-such-interpreter".into());
        let (_temp, mut ctx) = with_tools(tools);
        fs::write(ctx.guard().root().join("a.zz"), "").unwrap();

        let err = exec(&mut ctx, "run a.zz").unwrap_err();
        assert!(matches!(err, ShellError::ExternalTool { .. }));
        assert!(err.to_string().contains("not installed"));
    }

    #[test]
    fn git_clone_refuses_option_like_url() {
        let mut fx = Fixture::authenticated();
        assert!(matches!(
            fx.run("git clone --upload-pack=evil").unwrap_err(),
            ShellError::Usage(_)
        ));
    }

    #[test]
    fn git_clone_failure_reports_stderr() {
        let tools = Tools {
            git: "sh".into(),
            ..Tools::default()
        };
        // `sh clone -- url` fails because there is no script named "clone".
        let (_temp, mut ctx) = with_tools(tools);
        let err = exec(&mut ctx, "git clone https://example.invalid/r.git").unwrap_err();

        match err {
            ShellError::ExternalTool { tool, message } => {
                assert_eq!(tool, "git clone");
                assert!(!message.is_empty());
            }
            other => panic!("expected external tool error, got {:?}", other),
        }
    }

    #[test]
    fn git_clone_missing_tool() {
        let tools = Tools {
            git: "jailsh-no-such-git".into(),
            ..Tools::default()
        };
        let (_temp, mut ctx) = with_tools(tools);
        let err = exec(&mut ctx, "git clone https://example.invalid/r.git").unwrap_err();
        assert!(err.to_string().contains("not installed"));
    }

    #[test]
    fn install_success() {
        let tools = Tools {
            install: vec!["true".into()],
            ..Tools::default()
        };
        let (_temp, mut ctx) = with_tools(tools);
        let reply = exec(&mut ctx, "install requests").expect("install");
        assert_eq!(reply, Reply::success("Installed requests"));
    }

    #[test]
    fn install_failure_is_reported() {
        let tools = Tools {
            install: vec!["false".into()],
            ..Tools::default()
        };
        let (_temp, mut ctx) = with_tools(tools);
        let err = exec(&mut ctx, "install requests").unwrap_err();
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn install_requires_package() {
        let mut fx = Fixture::authenticated();
        assert!(matches!(
            fx.run("install").unwrap_err(),
            ShellError::MissingArgument(_)
        ));
        assert!(matches!(
            fx.run("install -r").unwrap_err(),
            ShellError::Usage(_)
        ));
    }
}
