//! Single-writer guard for session transitions. Every transition takes a
//! permit; a permit is stamped with the generation it started at and may only
//! apply its result while that generation is still the latest.

use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
};
use tokio::sync::{Mutex, MutexGuard};

/// What happens when a transition starts while another one is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConcurrencyPolicy {
    /// Refuse the newcomer.
    Reject,
    /// Wait for the running transition to finish.
    #[default]
    Queue,
    /// Run both; only the most recently started one applies its result.
    LastWriteWins,
}

impl ConcurrencyPolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConcurrencyPolicy::Reject => "reject",
            ConcurrencyPolicy::Queue => "queue",
            ConcurrencyPolicy::LastWriteWins => "last-write-wins",
        }
    }
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConcurrencyPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(ConcurrencyPolicy::Reject),
            "queue" => Ok(ConcurrencyPolicy::Queue),
            "last-write-wins" | "last_write_wins" | "lww" => Ok(ConcurrencyPolicy::LastWriteWins),
            other => Err(format!(
                "unknown concurrency policy: {other} (expected reject, queue or last-write-wins)"
            )),
        }
    }
}

/// Permission to run one transition.
#[derive(Debug)]
pub(crate) struct Permit<'a> {
    _guard: Option<MutexGuard<'a, ()>>,
    generation: u64,
}

#[derive(Debug)]
pub(crate) struct TransitionGate {
    policy: ConcurrencyPolicy,
    lock: Mutex<()>,
    generation: AtomicU64,
}

impl TransitionGate {
    pub(crate) fn new(policy: ConcurrencyPolicy) -> Self {
        Self {
            policy,
            lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn policy(&self) -> ConcurrencyPolicy {
        self.policy
    }

    /// Takes a permit according to the policy. Returns `None` only under
    /// `Reject` when another transition holds the lock.
    pub(crate) async fn enter(&self) -> Option<Permit<'_>> {
        let guard = match self.policy {
            ConcurrencyPolicy::Reject => Some(self.lock.try_lock().ok()?),
            ConcurrencyPolicy::Queue => Some(self.lock.lock().await),
            ConcurrencyPolicy::LastWriteWins => None,
        };
        Some(self.stamp(guard))
    }

    /// Like [`TransitionGate::enter`] but never refused; used by logout,
    /// which must always be able to clear the session.
    pub(crate) async fn enter_always(&self) -> Permit<'_> {
        let guard = match self.policy {
            ConcurrencyPolicy::Reject | ConcurrencyPolicy::Queue => Some(self.lock.lock().await),
            ConcurrencyPolicy::LastWriteWins => None,
        };
        self.stamp(guard)
    }

    /// Invalidates every permit handed out so far.
    pub(crate) fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_current(&self, permit: &Permit<'_>) -> bool {
        self.generation.load(Ordering::SeqCst) == permit.generation
    }

    fn stamp<'a>(&'a self, guard: Option<MutexGuard<'a, ()>>) -> Permit<'a> {
        Permit {
            _guard: guard,
            generation: self.bump(),
        }
    }
}
