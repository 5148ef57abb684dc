//! Spawning the runner adds exactly one OS thread per worker.

#![cfg(target_os = "linux")]

use std::fs;
use std::time::Duration;

use uniq_stacks::config::RunnerConfig;
use uniq_stacks::runner::{RecordingWaiter, Runner};

fn live_threads() -> usize {
    fs::read_dir("/proc/self/task").expect("procfs mounted").count()
}

#[test]
fn spawn_all_adds_six_threads_and_none_are_reaped() {
    let before = live_threads();

    let runner = Runner::new(RunnerConfig::new().tick(Duration::from_millis(10))).expect("config");
    let spawned = runner.spawn_all().expect("spawn");
    assert_eq!(live_threads(), before + 6);

    let mut waiter = RecordingWaiter::new();
    let abandoned = spawned.wait_on_first(&mut waiter).expect("wait");
    assert_eq!(abandoned.len(), 5);

    // Dropping the bookkeeping only detaches; the OS threads keep running.
    drop(abandoned);
    drop(waiter);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(live_threads(), before + 6);
}
