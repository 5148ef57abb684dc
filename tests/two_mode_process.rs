//! The `two-mode` binary seen from outside, through `/proc`.

#![cfg(target_os = "linux")]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn task_dir(pid: u32) -> PathBuf {
    PathBuf::from(format!("/proc/{pid}/task"))
}

fn thread_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| fs::read_to_string(entry.path().join("comm")).ok())
        .map(|comm| comm.trim_end().to_string())
        .collect();
    names.sort();
    names
}

#[test]
fn six_idle_workers_then_gone_after_kill() {
    let child = Command::new(env!("CARGO_BIN_EXE_two-mode"))
        .arg("--these-arguments-are-ignored")
        .env("RUST_LOG", "warn")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("launch two-mode");
    let mut child = KillOnDrop(child);
    let pid = child.0.id();
    let dir = task_dir(pid);

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut names = thread_names(&dir);
    while names.len() < 7 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
        names = thread_names(&dir);
    }

    // Give a stray extra thread a chance to show up before counting.
    std::thread::sleep(Duration::from_millis(200));
    names = thread_names(&dir);
    assert_eq!(names.len(), 7, "threads: {names:?}");

    let workers: Vec<_> = names.iter().filter(|n| n.starts_with("idle-")).cloned().collect();
    assert_eq!(
        workers,
        ["idle-a-0", "idle-a-1", "idle-a-2", "idle-b-0", "idle-b-1", "idle-b-2"]
    );
    assert!(child.0.try_wait().expect("poll child").is_none(), "runner exited early");

    child.0.kill().expect("kill two-mode");
    child.0.wait().expect("reap two-mode");
    assert!(!dir.exists());
}
