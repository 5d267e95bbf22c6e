//! Regcheck client – the coordination layer of the chemical regulation lookup page.
//!
//! A user types a substance (Japanese systematic name, IUPAC name or SMILES),
//! the client submits it to the resolution service and renders what comes
//! back: the English name the service translated to, the SMILES structure
//! code and the regulations the substance matched.
//!
//! The page itself is modelled headlessly. Its display slots live in a
//! [`page::Page`] owned by a [`session::Session`]; a host renders snapshots
//! of it and forwards user actions to [`app::RegcheckApp`].
//!
//! ## Modules
//! * [`coordinator`] – Submits lookups and makes sure only the latest one
//!   reaches the page, however the responses are ordered.
//! * [`loading`] – Rotating status messages while a lookup is in flight.
//! * [`modal`] – The single modal dialog (usage help, supported laws,
//!   announcements).
//! * [`overlay`] – The precaution/disclaimer overlays shown on page load.
//! * [`composition`] – Keeps an IME Enter from submitting a lookup.
//! * [`backend`] – The service seams and their `reqwest` implementation.
//! * [`markup`] – Escaping and the markup of results, errors and panels.
//! * [`config`], [`error`], [`telemetry`] – Settings, errors and logging.
//!
//! ## Quick Start
//! ```no_run
//! use regcheck_client::{app::RegcheckApp, config::ClientConfig, overlay::OverlayHosts};
//! # async fn run() -> regcheck_client::error::Result<()> {
//! regcheck_client::telemetry::init();
//! let app = RegcheckApp::connect(ClientConfig::load("regcheck.toml")?)?;
//! let _overlays = app.start_onboarding(OverlayHosts::default());
//! if let Some(lookup) = app.submit("benzene") {
//!     let outcome = lookup.await.expect("lookup task");
//!     println!("{outcome:?}: {}", app.page().result.markup());
//! }
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod backend;
pub mod clipboard;
pub mod composition;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod loading;
pub mod markup;
pub mod modal;
pub mod overlay;
pub mod page;
pub mod session;
pub mod telemetry;
