//! End-to-end tests for the jailsh binary.
//!
//! Each test drives the shell through piped stdin, with a config file that
//! points the root, the credential file and the remote endpoints at a
//! temporary workspace.

use std::fs;
use std::os::unix::fs::PermissionsExt;

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A workspace with `jail/` as the root, the process started in the
/// workspace itself.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(remote: &str) -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("config.toml")
            .write_str(&format!(
                r#"
root = "{root}"
credential_file = "session.json"

[remote]
login_url = "{remote}/login.php"
profile_url = "{remote}/profile.php"
timeout_secs = 2

[tools.interpreters]
sh = "sh"
"#,
                root = dir.path().join("jail").display(),
                remote = remote,
            ))
            .unwrap();
        Self { dir }
    }

    /// A workspace whose remote endpoints refuse connections.
    fn offline() -> Self {
        Self::new("http://127.0.0.1:9")
    }

    fn jailsh(&self, script: &str) -> Command {
        let mut cmd = Command::cargo_bin("jailsh").unwrap();
        cmd.current_dir(self.dir.path())
            .arg("--config")
            .arg(self.dir.path().join("config.toml"))
            .env_remove("JAILSH_CONFIG")
            .write_stdin(script.to_string());
        cmd
    }
}

async fn auth_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login.php"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "PHPSESSID=s3cr3t; path=/; HttpOnly")
                .set_body_string("login success"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/profile.php"))
        .and(header("cookie", "PHPSESSID=s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "profile": {"username": "alice", "email": "alice@example.com"}
        })))
        .mount(&server)
        .await;
    server
}

#[test]
fn help_flag_works() {
    Command::cargo_bin("jailsh")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("confined"));
}

#[test]
fn version_flag_works() {
    Command::cargo_bin("jailsh")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jailsh"));
}

#[test]
fn locked_shell_rejects_ls_but_allows_help() {
    let ws = Workspace::offline();

    ws.jailsh("ls\nhelp\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Type login <username> <password> to begin"))
        .stdout(predicate::str::contains("git clone <url>"))
        .stderr(predicate::str::contains("please login first to use 'ls'"));

    ws.dir.child("jail").assert(predicate::path::is_dir());
}

#[test]
fn offline_login_is_reported_and_shell_continues() {
    let ws = Workspace::offline();

    ws.jailsh("login alice hunter2\nhelp\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("login failed"))
        .stderr(predicate::str::contains("hunter2").not())
        .stdout(predicate::str::contains("Available commands:"));

    ws.dir.child("session.json").assert(predicate::path::missing());
}

#[test]
fn end_of_input_exits_cleanly() {
    let ws = Workspace::offline();
    ws.jailsh("").assert().success();
}

#[tokio::test(flavor = "multi_thread")]
async fn confined_session_walkthrough() {
    let server = auth_server().await;
    let ws = Workspace::new(&server.uri());
    ws.dir.child("jail/report.txt").write_str("quarterly").unwrap();

    ws.jailsh(
        "login alice hunter2\n\
         mkdir notes\n\
         cd notes\n\
         mkdir ../../escape\n\
         cd ..\n\
         download report.txt\n\
         download ../../etc/passwd\n\
         ls\n\
         exit\n",
    )
    .assert()
    .success()
    .stdout(predicate::str::contains("Logged in as alice."))
    .stdout(predicate::str::contains("alice@example.com"))
    .stdout(predicate::str::contains("notes"))
    .stderr(predicate::str::contains("access denied").count(2));

    ws.dir.child("jail/notes").assert(predicate::path::is_dir());
    ws.dir.child("escape").assert(predicate::path::missing());
    ws.dir.child("report.txt").assert("quarterly");
    ws.dir.child("passwd").assert(predicate::path::missing());
}

#[tokio::test(flavor = "multi_thread")]
async fn session_survives_restart_until_logout() {
    let server = auth_server().await;
    let ws = Workspace::new(&server.uri());

    ws.jailsh("login alice hunter2\nexit\n").assert().success();

    let session = ws.dir.child("session.json");
    session.assert(predicate::path::is_file());
    session.assert(predicate::str::contains("jailsh.session"));
    let mode = fs::metadata(session.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);

    ws.jailsh("ls\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("User:  alice"))
        .stdout(predicate::str::contains("No files or folders."))
        .stderr(predicate::str::contains("login first").not());

    ws.jailsh("logout\n").assert().success();
    session.assert(predicate::path::missing());

    ws.jailsh("ls\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("please login first"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_script_inside_root() {
    let server = auth_server().await;
    let ws = Workspace::new(&server.uri());
    ws.dir
        .child("jail/hello.sh")
        .write_str("echo hello from $(basename \"$PWD\")\n")
        .unwrap();

    ws.jailsh("login alice hunter2\nrun hello.sh\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello from jail"));
}

#[test]
fn quiet_hides_banner() {
    let ws = Workspace::offline();
    Command::cargo_bin("jailsh")
        .unwrap()
        .current_dir(ws.dir.path())
        .arg("--quiet")
        .arg("--config")
        .arg(ws.dir.path().join("config.toml"))
        .write_stdin("help\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("jailsh").not())
        .stdout(predicate::str::contains("Available commands:"));
}

#[test]
fn debug_logs_to_stderr() {
    let ws = Workspace::offline();
    Command::cargo_bin("jailsh")
        .unwrap()
        .current_dir(ws.dir.path())
        .arg("--debug")
        .arg("--config")
        .arg(ws.dir.path().join("config.toml"))
        .write_stdin("help\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("[debug] config:"))
        .stderr(predicate::str::contains("[debug] dispatch help"));
}

#[test]
fn invalid_config_is_fatal() {
    let ws = Workspace::offline();
    ws.dir.child("config.toml").write_str("bogus_key = 1\n").unwrap();

    ws.jailsh("help\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error: failed to load configuration"));
}

#[test]
fn unusable_root_is_fatal() {
    let ws = Workspace::offline();
    ws.dir.child("jail").write_str("not a directory").unwrap();

    ws.jailsh("help\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use root directory"));
}

#[test]
fn root_flag_overrides_config() {
    let ws = Workspace::offline();
    let other = ws.dir.child("other-root");

    ws.jailsh("exit\n")
        .arg("--root")
        .arg(other.path())
        .assert()
        .success();

    other.assert(predicate::path::is_dir());
    ws.dir.child("jail").assert(predicate::path::missing());
}

#[test]
fn init_writes_starter_config_once() {
    let dir = TempDir::new().unwrap();
    let config = dir.child("jailsh.toml");

    Command::cargo_bin("jailsh")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("init")
        .assert()
        .success();
    config.assert(predicate::str::contains("login_url"));

    Command::cargo_bin("jailsh")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    Command::cargo_bin("jailsh")
        .unwrap()
        .arg("--config")
        .arg(config.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn starting_inside_root_is_fatal() {
    let ws = Workspace::offline();
    let jail = ws.dir.child("jail");
    jail.create_dir_all().unwrap();

    ws.jailsh("help\n")
        .current_dir(jail.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is inside the root"));

    jail.child("jailsh-session.json")
        .assert(predicate::path::missing());
}

#[test]
fn credential_file_inside_root_is_fatal() {
    let ws = Workspace::offline();
    let config = ws.dir.child("config.toml");
    let text = fs::read_to_string(config.path())
        .unwrap()
        .replace("credential_file = \"session.json\"", "credential_file = \"jail/session.json\"");
    config.write_str(&text).unwrap();

    ws.jailsh("help\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be inside the root"));
}
