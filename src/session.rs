//! Session state shared by the page components.
//!
//! A [`Session`] owns the request generation counter together with the
//! [`Page`] it guards. Both live behind the same lock so that "is this
//! response still current?" and "render it" happen as one step: no other
//! task can advance the generation between the check and the write.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::page::Page;

/// Identifies how recent a lookup is. Strictly increasing per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 { self.0 }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct SessionState {
    latest: u64,
    page: Page,
}

#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
}

impl Session {
    pub fn new(page: Page) -> Arc<Self> {
        Arc::new(Self { state: Mutex::new(SessionState { latest: 0, page }) })
    }

    // a panic while holding the lock leaves the page in a consistent
    // (if stale) state, so poisoning is not propagated
    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Allocates the next generation and runs `prepare` on the page under the
    /// same lock, so the page never shows a half-started lookup.
    pub fn advance<F>(&self, prepare: F) -> Generation
    where
        F: FnOnce(Generation, &mut Page),
    {
        let mut state = self.lock();
        state.latest += 1;
        let generation = Generation(state.latest);
        prepare(generation, &mut state.page);
        generation
    }

    pub fn current(&self) -> Generation {
        Generation(self.lock().latest)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.lock().latest == generation.0
    }

    /// Runs `apply` only if `generation` is still the latest one.
    pub fn update_if_current<F, R>(&self, generation: Generation, apply: F) -> Option<R>
    where
        F: FnOnce(&mut Page) -> R,
    {
        let mut state = self.lock();
        if state.latest != generation.0 {
            return None;
        }
        Some(apply(&mut state.page))
    }

    pub fn update<F, R>(&self, apply: F) -> R
    where
        F: FnOnce(&mut Page) -> R,
    {
        apply(&mut self.lock().page)
    }

    /// A copy of the page as it is right now.
    pub fn page(&self) -> Page {
        self.lock().page.clone()
    }
}
