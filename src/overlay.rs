//! Onboarding overlays shown when the page opens.
//!
//! Two overlays are shown one after the other: precautions, then disclaimers.
//! Each one goes away after a fixed timeout or when the user clicks it,
//! whichever comes first. The precaution overlay fades out before the
//! disclaimer appears. A click cancels the pending timeout; any dismissal that
//! arrives for a stage the sequence already left is ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ClientConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayStage {
    Precaution,
    Disclaimer,
    Dismissed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlayVisual {
    #[default]
    Hidden,
    Visible,
    FadingOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    Timeout,
    Click,
}

/// Which overlay elements the page actually has.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHosts {
    pub precaution: bool,
    pub disclaimer: bool,
}

impl Default for OverlayHosts {
    fn default() -> Self {
        Self { precaution: true, disclaimer: true }
    }
}

#[derive(Debug)]
struct Sequence {
    stage: OverlayStage,
    // set while the current stage is on its way out
    leaving: bool,
    precaution: OverlayVisual,
    disclaimer: OverlayVisual,
    timeout: Option<JoinHandle<()>>,
    history: Vec<OverlayStage>,
}

#[derive(Debug)]
struct Shared {
    sequence: Mutex<Sequence>,
    hosts: OverlayHosts,
    timeout: Duration,
    fade: Duration,
    stage_tx: watch::Sender<OverlayStage>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Sequence> {
        self.sequence.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone)]
pub struct OverlaySequencer {
    shared: Arc<Shared>,
}

impl OverlaySequencer {
    /// Shows the first overlay and arms its timeout. Without a precaution host
    /// the whole sequence counts as dismissed. Must be called from within a
    /// tokio runtime.
    pub fn start(hosts: OverlayHosts, timeout: Duration, fade: Duration) -> Self {
        let first = if hosts.precaution { OverlayStage::Precaution } else { OverlayStage::Dismissed };
        let (stage_tx, _) = watch::channel(first);
        let shared = Arc::new(Shared {
            sequence: Mutex::new(Sequence {
                stage: first,
                leaving: false,
                precaution: OverlayVisual::Hidden,
                disclaimer: OverlayVisual::Hidden,
                timeout: None,
                history: Vec::new(),
            }),
            hosts,
            timeout,
            fade,
            stage_tx,
        });
        {
            let mut sequence = shared.lock();
            enter(&shared, &mut sequence, first);
        }
        Self { shared }
    }

    pub fn from_config(hosts: OverlayHosts, config: &ClientConfig) -> Self {
        Self::start(hosts, config.overlay_timeout(), config.overlay_fade())
    }

    /// The user clicked the overlay of `stage`.
    pub fn click(&self, stage: OverlayStage) {
        dismiss(&self.shared, stage, DismissTrigger::Click);
    }

    pub fn stage(&self) -> OverlayStage {
        self.shared.lock().stage
    }

    pub fn visual(&self, stage: OverlayStage) -> OverlayVisual {
        let sequence = self.shared.lock();
        match stage {
            OverlayStage::Precaution => sequence.precaution,
            OverlayStage::Disclaimer => sequence.disclaimer,
            OverlayStage::Dismissed => OverlayVisual::Hidden,
        }
    }

    /// Every stage entered so far, in order.
    pub fn history(&self) -> Vec<OverlayStage> {
        self.shared.lock().history.clone()
    }

    pub fn has_pending_timeout(&self) -> bool {
        self.shared.lock().timeout.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn subscribe(&self) -> watch::Receiver<OverlayStage> {
        self.shared.stage_tx.subscribe()
    }
}

fn enter(shared: &Arc<Shared>, sequence: &mut Sequence, stage: OverlayStage) {
    sequence.stage = stage;
    sequence.leaving = false;
    sequence.history.push(stage);
    shared.stage_tx.send_replace(stage);
    info!(?stage, "overlay stage entered");
    match stage {
        OverlayStage::Precaution => sequence.precaution = OverlayVisual::Visible,
        OverlayStage::Disclaimer => sequence.disclaimer = OverlayVisual::Visible,
        OverlayStage::Dismissed => return,
    }
    let timer_shared = Arc::clone(shared);
    let period = shared.timeout;
    sequence.timeout = Some(tokio::spawn(async move {
        tokio::time::sleep(period).await;
        dismiss(&timer_shared, stage, DismissTrigger::Timeout);
    }));
}

fn dismiss(shared: &Arc<Shared>, stage: OverlayStage, trigger: DismissTrigger) {
    let mut sequence = shared.lock();
    if sequence.stage != stage || sequence.leaving || stage == OverlayStage::Dismissed {
        debug!(?stage, ?trigger, current = ?sequence.stage, "dismissal ignored");
        return;
    }
    if let Some(timeout) = sequence.timeout.take() {
        // a firing timeout is the task itself and finishes right after this
        if trigger == DismissTrigger::Click {
            timeout.abort();
        }
    }
    debug!(?stage, ?trigger, "overlay dismissed");
    match stage {
        OverlayStage::Precaution => {
            sequence.leaving = true;
            sequence.precaution = OverlayVisual::FadingOut;
            let fade_shared = Arc::clone(shared);
            let fade = shared.fade;
            tokio::spawn(async move {
                tokio::time::sleep(fade).await;
                let mut sequence = fade_shared.lock();
                sequence.precaution = OverlayVisual::Hidden;
                let next = if fade_shared.hosts.disclaimer { OverlayStage::Disclaimer } else { OverlayStage::Dismissed };
                enter(&fade_shared, &mut sequence, next);
            });
        }
        OverlayStage::Disclaimer => {
            sequence.disclaimer = OverlayVisual::Hidden;
            enter(shared, &mut sequence, OverlayStage::Dismissed);
        }
        OverlayStage::Dismissed => {}
    }
}
