//! Wiring of the lookup page.
//!
//! [`RegcheckApp`] owns the session and the components built on top of it and
//! exposes one method per user affordance of the page.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::backend::{HttpBackend, ResolutionBackend, StaticResource, StaticResources};
use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::composition::CompositionGuard;
use crate::config::ClientConfig;
use crate::coordinator::{LookupOutcome, RequestCoordinator};
use crate::error::Result;
use crate::modal::{ClickTarget, ModalDialog};
use crate::overlay::{OverlayHosts, OverlaySequencer};
use crate::page::Page;
use crate::session::Session;

pub struct RegcheckApp {
    config: ClientConfig,
    session: Arc<Session>,
    coordinator: RequestCoordinator,
    modal: Arc<ModalDialog>,
    composition: Mutex<CompositionGuard>,
}

impl RegcheckApp {
    pub fn new(
        config: ClientConfig,
        backend: Arc<dyn ResolutionBackend>,
        resources: Arc<dyn StaticResources>,
        clipboard: Arc<dyn Clipboard>,
    ) -> Result<Self> {
        config.validate()?;
        let session = Session::new(Page::new(&config.copy_label));
        let coordinator = RequestCoordinator::new(Arc::clone(&session), backend, clipboard, &config);
        let modal = Arc::new(ModalDialog::new(resources));
        let composition = Mutex::new(CompositionGuard::new(config.composition_grace()));
        Ok(Self { config, session, coordinator, modal, composition })
    }

    /// Talks to the service at `config.base_url` over HTTP and copies into an
    /// in-memory clipboard.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let http = Arc::new(HttpBackend::from_config(&config)?);
        let clipboard = Arc::new(MemoryClipboard::new());
        Self::new(config, http.clone(), http, clipboard)
    }

    fn composition(&self) -> MutexGuard<'_, CompositionGuard> {
        self.composition.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &ClientConfig { &self.config }
    pub fn session(&self) -> &Arc<Session> { &self.session }
    pub fn coordinator(&self) -> &RequestCoordinator { &self.coordinator }
    pub fn modal(&self) -> &Arc<ModalDialog> { &self.modal }

    pub fn page(&self) -> Page {
        self.session.page()
    }

    /// Submit button.
    pub fn submit(&self, text: &str) -> Option<JoinHandle<LookupOutcome>> {
        self.coordinator.submit(text)
    }

    /// Enter in the input field; ignored while an IME composition is settling.
    pub fn press_enter(&self, text: &str) -> Option<JoinHandle<LookupOutcome>> {
        if !self.composition().should_submit_on_enter(Instant::now()) {
            debug!("enter suppressed during composition");
            return None;
        }
        self.coordinator.submit(text)
    }

    pub fn composition_start(&self) {
        self.composition().composition_start();
    }

    pub fn composition_end(&self) {
        self.composition().composition_end();
    }

    pub async fn copy_result(&self) -> Result<()> {
        self.coordinator.copy_result().await
    }

    pub fn show_usage(&self) {
        self.modal.open_usage();
    }

    pub fn show_supported_laws(&self) -> JoinHandle<Result<()>> {
        self.modal.spawn_resource(StaticResource::SupportedLaws)
    }

    pub fn show_announcements(&self) -> JoinHandle<Result<()>> {
        self.modal.spawn_resource(StaticResource::Announcements)
    }

    pub fn close_modal(&self) {
        self.modal.close();
    }

    pub fn click_modal(&self, target: ClickTarget) {
        self.modal.click_backdrop(target);
    }

    /// Starts the onboarding overlays for a page with the given hosts.
    pub fn start_onboarding(&self, hosts: OverlayHosts) -> OverlaySequencer {
        OverlaySequencer::from_config(hosts, &self.config)
    }
}
