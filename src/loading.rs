//! Cycling status messages shown while a lookup is in flight.
//!
//! [`LoadingIndicator::start`] hands out a [`LoadingGuard`]; the ticker behind
//! it rotates the message of the `Loading` result area of its own generation.
//! Only one ticker runs at a time: starting an indicator cancels the ticker of
//! the lookup it supersedes. Stopping is idempotent and also happens when the
//! guard is dropped, so every exit path of a lookup releases its indicator.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::{Instant, interval_at};
use tracing::{debug, trace};

use crate::page::ResultArea;
use crate::session::{Generation, Session};

#[derive(Debug, Default)]
struct Tracker {
    started: AtomicU64,
    stopped: AtomicU64,
    ticking: Mutex<Option<(Generation, AbortHandle)>>,
}

impl Tracker {
    fn ticking(&self) -> MutexGuard<'_, Option<(Generation, AbortHandle)>> {
        self.ticking.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    session: Arc<Session>,
    messages: Arc<[String]>,
    interval: Duration,
    tracker: Arc<Tracker>,
}

impl LoadingIndicator {
    /// With fewer than two messages or a zero interval the first message (or
    /// an empty line) stays put and no rotation happens.
    pub fn new(session: Arc<Session>, messages: Vec<String>, interval: Duration) -> Self {
        Self { session, messages: messages.into(), interval, tracker: Arc::default() }
    }

    pub fn first_message(&self) -> &str {
        self.messages.first().map(String::as_str).unwrap_or_default()
    }

    /// The result area a lookup of `generation` shows before its ticker runs.
    pub fn placeholder(&self, generation: Generation) -> ResultArea {
        ResultArea::Loading { generation, message: self.first_message().to_string() }
    }

    /// Starts rotating messages for `generation`. Must be called from within
    /// a tokio runtime.
    pub fn start(&self, generation: Generation) -> LoadingGuard {
        self.tracker.started.fetch_add(1, Ordering::SeqCst);
        let session = Arc::clone(&self.session);
        let messages = Arc::clone(&self.messages);
        let period = self.interval;
        let ticker = tokio::spawn(async move {
            if messages.len() < 2 || period.is_zero() {
                trace!(%generation, "nothing to rotate");
                return;
            }
            let mut ticks = interval_at(Instant::now() + period, period);
            let mut index = 0usize;
            loop {
                ticks.tick().await;
                index = (index + 1) % messages.len();
                let showing = session.update(|page| match &mut page.result {
                    ResultArea::Loading { generation: owner, message } if *owner == generation => {
                        *message = messages[index].clone();
                        true
                    }
                    _ => false,
                });
                if !showing {
                    trace!(%generation, "loading slot replaced, ticker exits");
                    break;
                }
            }
        });
        let superseded = self.tracker.ticking().replace((generation, ticker.abort_handle()));
        if let Some((previous, handle)) = superseded {
            handle.abort();
            trace!(%previous, "ticker of superseded lookup cancelled");
        }
        debug!(%generation, "loading indicator started");
        LoadingGuard { generation, ticker: Some(ticker), tracker: Arc::clone(&self.tracker) }
    }

    pub fn started(&self) -> u64 { self.tracker.started.load(Ordering::SeqCst) }
    pub fn stopped(&self) -> u64 { self.tracker.stopped.load(Ordering::SeqCst) }
    /// Number of guards handed out and not yet released.
    pub fn outstanding(&self) -> u64 {
        let stopped = self.stopped();
        self.started().saturating_sub(stopped)
    }

    /// The generation that currently owns the ticker, if any.
    pub fn ticking(&self) -> Option<Generation> {
        self.tracker.ticking().as_ref().map(|(generation, _)| *generation)
    }
}

#[derive(Debug)]
pub struct LoadingGuard {
    generation: Generation,
    ticker: Option<JoinHandle<()>>,
    tracker: Arc<Tracker>,
}

impl LoadingGuard {
    pub fn generation(&self) -> Generation { self.generation }

    pub fn is_stopped(&self) -> bool { self.ticker.is_none() }

    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            let mut ticking = self.tracker.ticking();
            if ticking.as_ref().is_some_and(|(owner, _)| *owner == self.generation) {
                *ticking = None;
            }
            drop(ticking);
            self.tracker.stopped.fetch_add(1, Ordering::SeqCst);
            debug!(generation = %self.generation, "loading indicator stopped");
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.stop();
    }
}
