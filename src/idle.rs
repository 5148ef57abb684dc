//! Idle worker bodies.
//!
//! Both variants sleep forever. Each runs through its own named function
//! ([`idle_a`], [`idle_b`]) so the two worker groups carry distinct frame
//! names in their stacks, even when program counters are ignored.

use std::time::Duration;

use crate::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdleVariant {
    A,
    B,
}

impl IdleVariant {
    /// Spawn order: every `A` worker is created before any `B` worker.
    pub const ALL: [IdleVariant; 2] = [IdleVariant::A, IdleVariant::B];

    pub fn label(self) -> &'static str {
        match self {
            IdleVariant::A => "a",
            IdleVariant::B => "b",
        }
    }

    /// The loop body for this variant. It never returns.
    pub fn body(self, tick: Duration) -> Box<dyn FnOnce() + Send + 'static> {
        match self {
            IdleVariant::A => Box::new(move || idle_a(tick)),
            IdleVariant::B => Box::new(move || idle_b(tick)),
        }
    }
}

/// Body of the group A workers.
#[inline(never)]
pub fn idle_a(tick: Duration) -> ! {
    idle_loop(IdleVariant::A, tick)
}

/// Body of the group B workers.
#[inline(never)]
pub fn idle_b(tick: Duration) -> ! {
    idle_loop(IdleVariant::B, tick)
}

/// Sleep `tick` at a time, forever.
///
/// Workers spawned through [`thread::ThreadBuilder`] bump their heartbeat at
/// the top of every cycle, so the first beat lands as soon as the loop is
/// entered. Inlined into each body so the linker cannot fold them together.
#[inline(always)]
fn idle_loop(variant: IdleVariant, tick: Duration) -> ! {
    let worker = thread::current();
    loop {
        if let Some(worker) = &worker {
            let beats = worker.heartbeat();
            tracing::trace!(id = %worker.id(), variant = variant.label(), beats, "idle tick");
        }
        std::thread::sleep(tick);
    }
}
