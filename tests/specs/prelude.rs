//! Test helpers for behavioral specifications.
//!
//! Provides a `Fabric` fixture: a private chat directory, daemon spawning,
//! and a CLI driver with per-invocation environment.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 20;
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where agentd and chat are built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the agentd daemon binary.
pub fn agentd_binary() -> PathBuf {
    binary_path("agentd")
}

/// Returns the path to the chat CLI binary.
pub fn chat_binary() -> PathBuf {
    binary_path("chat")
}

/// Poll until `check` passes or `max_ms` elapses.
pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    loop {
        if check() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
    }
}

/// Parse a process's stdout as JSON.
pub fn parse_stdout(output: &Output) -> serde_json::Value {
    let text = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(text.trim()).unwrap_or_else(|e| {
        panic!("stdout was not JSON ({e}): {text:?}");
    })
}

/// A private fabric: one chat directory, spawned daemons, a CLI driver.
pub struct Fabric {
    dir: tempfile::TempDir,
    daemons: Vec<(String, Child)>,
}

impl Fabric {
    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("chat")).expect("chat dir");
        Self {
            dir,
            daemons: Vec::new(),
        }
    }

    /// The directory holding the registry and endpoints.
    pub fn chat_dir(&self) -> PathBuf {
        self.dir.path().join("chat")
    }

    pub fn registry_path(&self) -> PathBuf {
        self.chat_dir().join("registry.json")
    }

    pub fn endpoint(&self, name: &str) -> PathBuf {
        self.chat_dir().join(format!("{name}.sock"))
    }

    /// Per-agent working directory (hosts `.unread-messages`).
    pub fn cwd(&self, name: &str) -> PathBuf {
        let dir = self.dir.path().join(name);
        std::fs::create_dir_all(&dir).expect("agent cwd");
        dir
    }

    pub fn unread_file(&self, name: &str) -> PathBuf {
        self.cwd(name).join(".unread-messages")
    }

    /// Read the registry file as JSON (empty object when absent).
    pub fn registry(&self) -> serde_json::Value {
        match std::fs::read_to_string(self.registry_path()) {
            Ok(text) if !text.trim().is_empty() => {
                serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({}))
            }
            _ => serde_json::json!({}),
        }
    }

    fn daemon_command(&self, name: &str) -> Command {
        let mut cmd = Command::new(agentd_binary());
        cmd.args(["--name", name])
            .args(["--context", &format!("{name}-project")])
            .args(["--presentation", &format!("I am {name}")])
            .arg("--cwd")
            .arg(self.cwd(name))
            .env("AGENT_CHAT_DIR", self.chat_dir())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }

    /// Spawn a daemon and wait until it answers a status command.
    pub fn start_agent(&mut self, name: &str) {
        let child = self.daemon_command(name).spawn().expect("spawn agentd");
        self.daemons.push((name.to_string(), child));

        let ready = wait_for(SPEC_WAIT_MAX_MS, || {
            self.endpoint(name).exists()
                && self
                    .chat(name, &["status"])
                    .status
                    .success()
        });
        assert!(ready, "agent {name} did not become ready");
    }

    /// Spawn a daemon expected to fail startup; returns its exit status.
    pub fn start_agent_expect_failure(&self, name: &str) -> std::process::ExitStatus {
        let mut child = self.daemon_command(name).spawn().expect("spawn agentd");

        let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS);
        loop {
            if let Ok(Some(status)) = child.try_wait() {
                return status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                panic!("agent {name} did not exit within the deadline");
            }
            std::thread::sleep(Duration::from_millis(SPEC_POLL_INTERVAL_MS));
        }
    }

    /// SIGKILL a daemon — simulates a crash with no graceful shutdown.
    pub fn kill_agent(&mut self, name: &str) {
        for (agent, child) in &mut self.daemons {
            if agent == name {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }

    /// SIGTERM a daemon and wait for it to exit.
    pub fn terminate_agent(&mut self, name: &str) {
        for (agent, child) in &mut self.daemons {
            if agent == name {
                let _ = Command::new("kill")
                    .args(["-15", &child.id().to_string()])
                    .status();
                let _ = child.wait();
            }
        }
    }

    fn chat_command(&self, agent: &str, args: &[&str]) -> Command {
        let mut cmd = Command::new(chat_binary());
        cmd.args(["--agent", agent])
            .args(args)
            .env("AGENT_CHAT_DIR", self.chat_dir());
        cmd
    }

    /// Run a chat CLI command to completion.
    pub fn chat(&self, agent: &str, args: &[&str]) -> Output {
        self.chat_command(agent, args)
            .output()
            .expect("run chat binary")
    }

    /// Spawn a chat CLI command without waiting (for blocking asks).
    pub fn chat_spawn(&self, agent: &str, args: &[&str]) -> Child {
        self.chat_command(agent, args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn chat binary")
    }

    /// Drain an agent's queue so the unread gate is open.
    pub fn drain(&self, agent: &str) {
        let output = self.chat(agent, &["receive", "--timeout", "1"]);
        assert!(
            output.status.code() == Some(0) || output.status.code() == Some(2),
            "drain failed for {agent}: {:?}",
            output
        );
    }
}

impl Drop for Fabric {
    fn drop(&mut self) {
        for (_, child) in &mut self.daemons {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
