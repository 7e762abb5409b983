#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

pub const MIB: u64 = 1024 * 1024;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

impl CmdResult {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_csg") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "csg.exe" } else { "csg" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve csg binary path for integration test"),
    }
}

/// A scratch working tree with a stand-in for `git`.
///
/// `git` is replaced by `sh`, so the lister's `diff --staged ...` call runs
/// the `./diff` script written by [`Workspace::staged`]. No executable bit is
/// needed.
pub struct Workspace {
    dir: tempfile::TempDir,
    git_binary: String,
    extra_env: Vec<(String, String)>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create workspace"),
            git_binary: "sh".to_string(),
            extra_env: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Make the fake `git diff -z` print these paths, NUL-terminated.
    pub fn staged(&self, paths: &[&str]) -> &Self {
        let mut script = String::from(
            "#!/bin/sh\ncase \" $* \" in *\" -z \"*) ;; *) echo 'fake git: expected -z' >&2; exit 2 ;; esac\n",
        );
        for path in paths {
            let quoted = path.replace('\'', "'\\''");
            script.push_str(&format!("printf '%s\\000' '{quoted}'\n"));
        }
        self.write_diff_script(&script);
        self
    }

    /// Make the fake `git diff` fail like git outside a repository.
    pub fn staged_fails(&self) -> &Self {
        self.write_diff_script(
            "#!/bin/sh\necho 'fatal: not a git repository (or any of the parent directories): .git' >&2\nexit 128\n",
        );
        self
    }

    /// Create a sparse file of exactly `bytes` bytes.
    pub fn file(&self, name: &str, bytes: u64) -> &Self {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        let file = fs::File::create(&path).expect("create file");
        file.set_len(bytes).expect("size file");
        self
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn git_binary(mut self, binary: &str) -> Self {
        self.git_binary = binary.to_string();
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.extra_env.push((name.to_string(), value.to_string()));
        self
    }

    fn write_diff_script(&self, script: &str) {
        fs::write(self.path().join("diff"), script).expect("write diff script");
    }

    pub fn run(&self, case_name: &str, args: &[&str]) -> CmdResult {
        let root = std::env::temp_dir().join("csg-test-logs");
        fs::create_dir_all(&root).expect("create temp test log dir");

        let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
        let bin_path = resolve_bin_path();

        let mut command = Command::new(&bin_path);
        command
            .args(args)
            .current_dir(self.path())
            .env("HOME", self.path())
            .env("CSG_GIT_BINARY", &self.git_binary)
            .env("NO_COLOR", "1")
            .env("RUST_BACKTRACE", "1");
        for name in [
            "CSG_MAX_MIB",
            "CSG_HINT",
            "CSG_ON_LIST_FAILURE",
            "CSG_JSONL_LOG",
            "CSG_OUTPUT_FORMAT",
            "GIT_DIR",
            "GIT_INDEX_FILE",
            "GIT_WORK_TREE",
        ] {
            command.env_remove(name);
        }
        for (name, value) in &self.extra_env {
            command.env(name, value);
        }
        let output = command.output().expect("execute csg command");

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let mut log_content = String::new();
        log_content.push_str(&format!("case={case_name}\n"));
        log_content.push_str(&format!("bin={}\n", bin_path.display()));
        log_content.push_str(&format!("cwd={}\n", self.path().display()));
        log_content.push_str(&format!("args={args:?}\n"));
        log_content.push_str(&format!("status={}\n", output.status));
        log_content.push_str("----- stdout -----\n");
        log_content.push_str(&stdout);
        log_content.push('\n');
        log_content.push_str("----- stderr -----\n");
        log_content.push_str(&stderr);
        log_content.push('\n');
        fs::write(&log_path, log_content).expect("write test log");

        CmdResult {
            status: output.status,
            stdout,
            stderr,
            log_path,
        }
    }
}
