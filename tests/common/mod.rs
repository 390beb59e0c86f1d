//! Shared test infrastructure for integration tests.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Output of one `miscore` invocation.
#[derive(Debug)]
pub struct CliOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// A scratch directory seeded with files from tests/data/.
pub struct TestFixture {
    pub dir: TempDir,
}

fn manifest_dir() -> PathBuf {
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".into()))
}

/// Path of a checked-in fixture under tests/data/.
pub fn data_path(name: &str) -> PathBuf {
    manifest_dir().join("tests/data").join(name)
}

/// Run the binary from `cwd` with stdin closed, so interactive prompts see
/// end of input.
pub fn run_in(cwd: &Path, args: &[&str]) -> CliOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_miscore"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MISCORE_LOG")
        .stdin(Stdio::null())
        .output()
        .expect("run miscore");
    collect(output)
}

/// Run the binary from `cwd`, answering prompts with `input`.
pub fn run_with_input(cwd: &Path, args: &[&str], input: &str) -> CliOutput {
    let mut child = Command::new(env!("CARGO_BIN_EXE_miscore"))
        .args(args)
        .current_dir(cwd)
        .env_remove("MISCORE_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn miscore");
    child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(input.as_bytes())
        .expect("write answers");
    collect(child.wait_with_output().expect("wait for miscore"))
}

fn collect(output: std::process::Output) -> CliOutput {
    CliOutput {
        success: output.status.success(),
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

pub fn run(args: &[&str]) -> CliOutput {
    run_in(&manifest_dir(), args)
}

impl TestFixture {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Copy tests/data/{name} (file or directory tree) into a fresh scratch
    /// directory.
    pub fn with(names: &[&str]) -> Self {
        let fixture = Self::empty();
        for name in names {
            copy_tree(&data_path(name), &fixture.path(name));
        }
        fixture
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name)).expect("read fixture file")
    }

    pub fn write(&self, name: &str, contents: &str) {
        std::fs::write(self.path(name), contents).expect("write fixture file");
    }

    pub fn run(&self, args: &[&str]) -> CliOutput {
        run_in(self.dir.path(), args)
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> CliOutput {
        run_with_input(self.dir.path(), args, input)
    }

    /// Parsed JSON of a ledger in the scratch directory.
    pub fn json(&self, name: &str) -> serde_json::Value {
        serde_json::from_str(&self.read(name)).expect("ledger is JSON")
    }
}

fn copy_tree(from: &Path, to: &Path) {
    if from.is_dir() {
        std::fs::create_dir_all(to).expect("create fixture dir");
        for entry in std::fs::read_dir(from).expect("read fixture dir") {
            let entry = entry.expect("fixture dir entry");
            copy_tree(&entry.path(), &to.join(entry.file_name()));
        }
    } else {
        std::fs::copy(from, to).expect("copy fixture file");
    }
}

/// Names of the games in a parsed ledger, in file order.
pub fn game_names(ledger: &serde_json::Value) -> Vec<String> {
    ledger["games"]
        .as_array()
        .map(|games| {
            games
                .iter()
                .filter_map(|game| game["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
