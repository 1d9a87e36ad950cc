//! Session orchestration
//!
//! Thin layer composing [`JobClient`] and [`PollScheduler`]: it validates
//! and submits expressions, registers the pollers, and publishes state
//! transitions to the presentation layer over a channel. All tracking logic
//! lives below it; all rendering lives above it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use evalq_core::domain::job::{Job, JobId};

use crate::error::{ClientError, Result};
use crate::jobs::JobClient;
use crate::scheduler::{PollKey, PollScheduler, TickOutcome};

/// Poll intervals, independently configurable
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// How often to poll the status of one in-flight job
    pub job_interval: Duration,
    /// How often to refresh the aggregate history list
    pub history_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            job_interval: Duration::from_millis(1000),
            history_interval: Duration::from_millis(5000),
        }
    }
}

/// State transition published to the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The gateway accepted a submission and assigned an id
    Accepted { id: JobId },
    /// A poll observed the current state of a tracked job
    Updated(Job),
    /// A history poll completed; jobs are sorted newest-first
    History(Vec<Job>),
    /// The session is unrecoverably expired; all pollers are cancelled
    Expired,
}

/// Composes submit, polling, and event publishing for one user session
pub struct SessionController {
    jobs: JobClient,
    scheduler: PollScheduler,
    config: PollConfig,
    events: UnboundedSender<SessionEvent>,
    history_started: AtomicBool,
}

impl SessionController {
    /// Create a controller and the event stream the presentation layer reads
    pub fn new(jobs: JobClient, config: PollConfig) -> (Self, UnboundedReceiver<SessionEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            jobs,
            scheduler: PollScheduler::new(),
            config,
            events,
            history_started: AtomicBool::new(false),
        };
        (controller, receiver)
    }

    /// Submit an expression and begin tracking it
    ///
    /// On success the job poller starts, and — only for the first successful
    /// submission of the session — the history poller starts as well. On any
    /// failure the error is returned for display and no polling starts.
    pub async fn submit(&self, expression: &str) -> Result<JobId> {
        let id = self.jobs.submit(expression).await?;
        info!(%id, "submission accepted");

        let _ = self.events.send(SessionEvent::Accepted { id });
        self.track(id);

        if !self.history_started.swap(true, Ordering::SeqCst) {
            self.start_history_poller();
        }

        Ok(id)
    }

    /// Poll an already-submitted job until it reaches a terminal state
    pub fn track(&self, id: JobId) {
        let jobs = self.jobs.clone();
        let events = self.events.clone();
        let scheduler = self.scheduler.clone();

        self.scheduler
            .start_polling(PollKey::Job(id), self.config.job_interval, move || {
                let jobs = jobs.clone();
                let events = events.clone();
                let scheduler = scheduler.clone();
                async move {
                    match jobs.fetch_one(id).await {
                        Ok(job) => {
                            let terminal = job.is_terminal();
                            let _ = events.send(SessionEvent::Updated(job));
                            if terminal {
                                info!(%id, "job reached a terminal state");
                                TickOutcome::Stop
                            } else {
                                TickOutcome::Continue
                            }
                        }
                        Err(err) => Self::handle_tick_error(err, &events, &scheduler),
                    }
                }
            });
    }

    fn start_history_poller(&self) {
        let jobs = self.jobs.clone();
        let events = self.events.clone();
        let scheduler = self.scheduler.clone();

        info!("starting history poller");
        self.scheduler
            .start_polling(PollKey::History, self.config.history_interval, move || {
                let jobs = jobs.clone();
                let events = events.clone();
                let scheduler = scheduler.clone();
                async move {
                    match jobs.fetch_all().await {
                        Ok(mut history) => {
                            history.sort_by(|a, b| b.id.cmp(&a.id));
                            let _ = events.send(SessionEvent::History(history));
                            TickOutcome::Continue
                        }
                        Err(err) => Self::handle_tick_error(err, &events, &scheduler),
                    }
                }
            });
    }

    /// A transient failure skips this tick and keeps the timer alive; an
    /// expired session tears the whole session down.
    fn handle_tick_error(
        err: ClientError,
        events: &UnboundedSender<SessionEvent>,
        scheduler: &PollScheduler,
    ) -> TickOutcome {
        if err.is_transient() {
            warn!(%err, "poll tick failed, retrying on the next tick");
            TickOutcome::Continue
        } else {
            warn!(%err, "session expired, cancelling all pollers");
            let _ = events.send(SessionEvent::Expired);
            scheduler.stop_all();
            TickOutcome::Stop
        }
    }

    /// Fetch the history once, newest-first (initial page load)
    pub async fn fetch_history(&self) -> Result<Vec<Job>> {
        let mut history = self.jobs.fetch_all().await?;
        history.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(history)
    }

    pub fn is_tracking(&self, id: JobId) -> bool {
        self.scheduler.is_active(PollKey::Job(id))
    }

    /// Session teardown: cancel every active poller
    pub fn shutdown(&self) {
        self.scheduler.stop_all();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.scheduler.stop_all();
    }
}
