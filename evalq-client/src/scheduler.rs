//! Poll scheduler
//!
//! Owns the set of active repeating pollers: one per in-flight job plus one
//! for the aggregate history list. The registry guarantees at most one live
//! poller per key, idempotent cancellation, and safe self-cancellation from
//! inside a tick.
//!
//! Each poller is a tokio task driven by a [`tokio::time::interval`] and a
//! [`CancellationToken`]; the token replaces the original's global interval
//! ids, which let a new job's poll silently clobber an older one.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use evalq_core::domain::job::JobId;

/// What a poller is tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollKey {
    /// Status of a single in-flight job
    Job(JobId),
    /// The aggregate job history list
    History,
}

impl fmt::Display for PollKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollKey::Job(id) => write!(f, "job {id}"),
            PollKey::History => f.write_str("history"),
        }
    }
}

/// Verdict of one tick: keep the timer running or retire it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// One live poller: cancelling the token stops the task at its next
/// suspension point, and no tick body starts after cancellation.
struct PollHandle {
    generation: u64,
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl PollHandle {
    fn cancel(self) {
        self.token.cancel();
        self.task.abort();
    }
}

#[derive(Default)]
struct Registry {
    handles: HashMap<PollKey, PollHandle>,
    next_generation: u64,
}

/// Owner of all repeating pollers
///
/// The handle map is the only shared mutable state in the client; the mutex
/// is never held across an await.
#[derive(Clone, Default)]
pub struct PollScheduler {
    registry: Arc<Mutex<Registry>>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the poller for a key
    ///
    /// Any existing poller for the same key is cancelled first, so two live
    /// timers for one key cannot exist. The first tick fires one full
    /// `interval` after registration; missed ticks are delayed, not bursted.
    ///
    /// `tick` runs to completion on every firing and decides whether the
    /// poller continues. Returning [`TickOutcome::Stop`] retires the poller
    /// as the same tick's final action, so no further tick fires once a
    /// terminal state is observed.
    pub fn start_polling<F, Fut>(&self, key: PollKey, interval: Duration, tick: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TickOutcome> + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let weak_registry = Arc::downgrade(&self.registry);

        let mut registry = self.registry.lock().unwrap();
        let replaced = registry.handles.remove(&key);
        registry.next_generation += 1;
        let generation = registry.next_generation;

        let task = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval's first tick completes immediately; consume it so the
            // first real tick fires a full interval after registration.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                // A tick scheduled before cancellation must not run its body.
                if task_token.is_cancelled() {
                    break;
                }
                if tick().await == TickOutcome::Stop {
                    Self::retire(&weak_registry, key, generation);
                    break;
                }
            }
            debug!(%key, "poller exited");
        });

        registry.handles.insert(
            key,
            PollHandle {
                generation,
                token,
                task,
            },
        );
        drop(registry);

        if let Some(old) = replaced {
            debug!(%key, "replacing active poller");
            old.cancel();
        }
    }

    /// Stop the poller for a key
    ///
    /// A no-op when the key is idle; calling it any number of times is
    /// equivalent to calling it once.
    pub fn stop_polling(&self, key: PollKey) {
        let removed = self.registry.lock().unwrap().handles.remove(&key);
        if let Some(handle) = removed {
            debug!(%key, "stopping poller");
            handle.cancel();
        }
    }

    /// Cancel every active poller (session teardown)
    pub fn stop_all(&self) {
        let handles: Vec<_> = {
            let mut registry = self.registry.lock().unwrap();
            registry.handles.drain().collect()
        };
        for (key, handle) in handles {
            debug!(%key, "stopping poller");
            handle.cancel();
        }
    }

    pub fn is_active(&self, key: PollKey) -> bool {
        self.registry.lock().unwrap().handles.contains_key(&key)
    }

    pub fn active_count(&self) -> usize {
        self.registry.lock().unwrap().handles.len()
    }

    /// Removes a key's entry from inside its own tick, but only while the
    /// stored handle is still the caller's own: a restart during a slow tick
    /// must not lose the newer handle.
    fn retire(registry: &Weak<Mutex<Registry>>, key: PollKey, generation: u64) {
        if let Some(registry) = registry.upgrade() {
            let mut registry = registry.lock().unwrap();
            if registry
                .handles
                .get(&key)
                .is_some_and(|handle| handle.generation == generation)
            {
                registry.handles.remove(&key);
            }
        }
    }
}
