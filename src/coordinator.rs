//! Lookup request coordination.
//!
//! Every submission advances the session generation. When the response comes
//! back it may only touch the page if its generation is still the latest one;
//! an older response is dropped without a trace on the page, however late it
//! arrives. The loading indicator of a lookup is held as a guard for the whole
//! round trip and released exactly once, whatever the outcome.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{ResolutionBackend, SearchReply};
use crate::clipboard::Clipboard;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::loading::{LoadingGuard, LoadingIndicator};
use crate::markup;
use crate::page::ResultArea;
use crate::session::{Generation, Session};

pub const COPY_FAILED: &str = "Copy failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Rendered,
    ApplicationError,
    TransportError,
    /// A newer lookup was submitted before this one completed.
    Stale,
}

pub struct RequestCoordinator {
    session: Arc<Session>,
    backend: Arc<dyn ResolutionBackend>,
    clipboard: Arc<dyn Clipboard>,
    indicator: LoadingIndicator,
    copy_label: String,
    copied_label: String,
    copy_revert: Duration,
    revert: Mutex<Option<JoinHandle<()>>>,
}

impl RequestCoordinator {
    pub fn new(
        session: Arc<Session>,
        backend: Arc<dyn ResolutionBackend>,
        clipboard: Arc<dyn Clipboard>,
        config: &ClientConfig,
    ) -> Self {
        let indicator = LoadingIndicator::new(
            Arc::clone(&session),
            config.loading_messages.clone(),
            config.loading_interval(),
        );
        Self {
            session,
            backend,
            clipboard,
            indicator,
            copy_label: config.copy_label.clone(),
            copied_label: config.copied_label.clone(),
            copy_revert: config.copy_revert(),
            revert: Mutex::new(None),
        }
    }

    /// The synchronous half of a submission: allocates the generation, swaps
    /// the result area for the loading placeholder, hides the copy button and
    /// starts the indicator. Empty input is ignored.
    pub fn begin(&self, text: &str) -> Option<PendingLookup> {
        if text.is_empty() {
            debug!("empty submission ignored");
            return None;
        }
        let generation = self.session.advance(|generation, page| {
            page.result = self.indicator.placeholder(generation);
            page.copy_button.visible = false;
        });
        let guard = self.indicator.start(generation);
        info!(%generation, "lookup submitted");
        Some(PendingLookup {
            text: text.to_string(),
            generation,
            guard,
            session: Arc::clone(&self.session),
            backend: Arc::clone(&self.backend),
        })
    }

    /// Submits `text` and resolves it on a background task.
    pub fn submit(&self, text: &str) -> Option<JoinHandle<LookupOutcome>> {
        self.begin(text).map(|pending| tokio::spawn(pending.resolve()))
    }

    /// Submits `text` and waits for its outcome.
    pub async fn lookup(&self, text: &str) -> Option<LookupOutcome> {
        match self.begin(text) {
            Some(pending) => Some(pending.resolve().await),
            None => None,
        }
    }

    pub fn generation(&self) -> Generation {
        self.session.current()
    }

    pub fn indicator(&self) -> &LoadingIndicator {
        &self.indicator
    }

    /// Puts the plain text of the shown result on the clipboard and flips the
    /// copy button to its confirmation label for a while. A failure raises an
    /// alert and leaves everything else as it was.
    pub async fn copy_result(&self) -> Result<()> {
        let Some(text) = self.session.update(|page| page.result_text().map(str::to_string)) else {
            debug!("nothing to copy");
            return Ok(());
        };
        if let Err(e) = self.clipboard.write_text(&text).await {
            warn!(error = %e, "copy to clipboard failed");
            self.session.update(|page| page.alerts.push(COPY_FAILED.to_string()));
            return Err(e);
        }
        let copied_label = self.copied_label.clone();
        self.session.update(|page| {
            page.copy_button.label = copied_label;
            page.copy_button.copied = true;
        });

        let session = Arc::clone(&self.session);
        let label = self.copy_label.clone();
        let delay = self.copy_revert;
        let revert = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            session.update(|page| {
                page.copy_button.label = label;
                page.copy_button.copied = false;
            });
        });
        // a second copy restarts the confirmation period
        let previous = self.revert.lock().unwrap_or_else(PoisonError::into_inner).replace(revert);
        if let Some(previous) = previous {
            previous.abort();
        }
        Ok(())
    }
}

/// A submitted lookup waiting for its response.
pub struct PendingLookup {
    text: String,
    generation: Generation,
    guard: LoadingGuard,
    session: Arc<Session>,
    backend: Arc<dyn ResolutionBackend>,
}

impl PendingLookup {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Awaits the response and renders it if this lookup is still current.
    pub async fn resolve(mut self) -> LookupOutcome {
        let reply = self.backend.search(&self.text).await;
        let outcome = self.apply(reply);
        self.guard.stop();
        outcome
    }

    fn apply(&self, reply: Result<SearchReply>) -> LookupOutcome {
        let generation = self.generation;
        let (outcome, area, reveal_copy) = match reply {
            Ok(SearchReply::Found(result)) => {
                let view = markup::render_result(&self.text, &result);
                (LookupOutcome::Rendered, ResultArea::Rendered(view), true)
            }
            Ok(SearchReply::Rejected(message)) => {
                (LookupOutcome::ApplicationError, ResultArea::Failed(markup::error_markup(&message)), false)
            }
            Err(e) => {
                warn!(%generation, error = %e, "lookup failed in transit");
                (LookupOutcome::TransportError, ResultArea::Failed(markup::communication_error_markup()), false)
            }
        };
        let applied = self.session.update_if_current(generation, |page| {
            page.result = area;
            page.copy_button.visible = reveal_copy;
        });
        match applied {
            Some(()) => {
                info!(%generation, ?outcome, "lookup completed");
                outcome
            }
            None => {
                debug!(%generation, ?outcome, "superseded response discarded");
                LookupOutcome::Stale
            }
        }
    }
}
