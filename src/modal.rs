//! The single modal dialog of the page.
//!
//! Any trigger may (re)open the dialog; opening replaces title and body, there
//! is no stacking. Remote panels open straight away with a placeholder body and
//! are populated once their text arrives. Each opening takes a ticket, and a
//! fetch only populates the dialog if no other opening happened since it
//! started, so a slow panel can never overwrite the one the user asked for last.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::backend::{StaticResource, StaticResources};
use crate::error::Result;
use crate::markup;

pub const LOADING_BODY: &str = "Loading...";
pub const FETCH_FAILED: &str = "Failed to load.";
pub const USAGE_TITLE: &str = "How to use";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalContent<'a> {
    /// Plain text; escaped, line breaks kept.
    Text(&'a str),
    /// Trusted markup defined by this crate, inserted as is.
    Markup(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub title: String,
    /// Body as markup.
    pub body: String,
    pub is_open: bool,
}

/// Where a click on the open dialog landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed backdrop around the panel.
    Overlay,
    /// Anything inside the panel.
    Content,
}

#[derive(Debug, Default)]
struct Inner {
    state: ModalState,
    ticket: u64,
}

pub struct ModalDialog {
    inner: Mutex<Inner>,
    resources: Arc<dyn StaticResources>,
}

impl ModalDialog {
    pub fn new(resources: Arc<dyn StaticResources>) -> Self {
        Self { inner: Mutex::default(), resources }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self, title: &str, content: ModalContent<'_>) {
        self.open_ticketed(title, content);
    }

    fn open_ticketed(&self, title: &str, content: ModalContent<'_>) -> u64 {
        let body = match content {
            ModalContent::Text(text) => markup::text_to_markup(text),
            ModalContent::Markup(markup) => markup.to_string(),
        };
        let mut inner = self.lock();
        inner.ticket += 1;
        inner.state = ModalState { title: title.to_string(), body, is_open: true };
        inner.ticket
    }

    /// Hides the dialog. Closing a closed dialog changes nothing.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.state.is_open {
            inner.state.is_open = false;
            debug!(title = %inner.state.title, "modal closed");
        }
    }

    /// Backdrop clicks close the dialog, clicks inside the panel do not.
    pub fn click_backdrop(&self, target: ClickTarget) {
        if target == ClickTarget::Overlay {
            self.close();
        }
    }

    pub fn open_usage(&self) {
        self.open(USAGE_TITLE, ModalContent::Markup(markup::USAGE_MARKUP));
    }

    /// Opens the panel for `resource` and fills it once the text is fetched.
    /// A failed fetch shows [`FETCH_FAILED`] in the still open dialog and is
    /// also returned to the caller.
    pub async fn open_resource(&self, resource: StaticResource) -> Result<()> {
        let ticket = self.open_ticketed(resource.title(), ModalContent::Text(LOADING_BODY));
        self.populate(ticket, resource).await
    }

    /// Like [`open_resource`](Self::open_resource), but only the fetch runs on
    /// a background task; the placeholder is showing when this returns.
    pub fn spawn_resource(self: &Arc<Self>, resource: StaticResource) -> JoinHandle<Result<()>> {
        let ticket = self.open_ticketed(resource.title(), ModalContent::Text(LOADING_BODY));
        let dialog = Arc::clone(self);
        tokio::spawn(async move { dialog.populate(ticket, resource).await })
    }

    async fn populate(&self, ticket: u64, resource: StaticResource) -> Result<()> {
        let (body, outcome) = match self.resources.fetch_text(resource).await {
            Ok(text) => (markup::text_to_markup(&text), Ok(())),
            Err(e) => {
                warn!(?resource, error = %e, "static resource could not be loaded");
                (FETCH_FAILED.to_string(), Err(e))
            }
        };
        let mut inner = self.lock();
        if inner.ticket == ticket {
            inner.state.body = body;
        } else {
            debug!(?resource, "dialog reopened meanwhile, fetched body discarded");
        }
        outcome
    }

    pub fn state(&self) -> ModalState {
        self.lock().state.clone()
    }

    pub fn is_open(&self) -> bool {
        self.lock().state.is_open
    }
}
