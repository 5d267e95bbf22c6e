#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use regcheck_client::app::RegcheckApp;
use regcheck_client::backend::{ResolutionBackend, SearchReply, StaticResource, StaticResources};
use regcheck_client::clipboard::{Clipboard, MemoryClipboard};
use regcheck_client::config::ClientConfig;
use regcheck_client::error::{RegcheckError, Result};

/// What the scripted service answers for one input.
#[derive(Clone)]
pub enum Scripted {
    /// A raw response body, parsed like the HTTP backend does.
    Body(&'static str),
    /// The exchange fails in transit.
    Broken,
}

#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<HashMap<String, (Duration, Scripted)>>,
}

impl ScriptedBackend {
    pub fn new() -> Self { Self::default() }

    pub fn reply(self, text: &str, delay_ms: u64, scripted: Scripted) -> Self {
        self.replies.lock().unwrap().insert(text.to_string(), (Duration::from_millis(delay_ms), scripted));
        self
    }
}

#[async_trait]
impl ResolutionBackend for ScriptedBackend {
    async fn search(&self, text: &str) -> Result<SearchReply> {
        let scripted = self.replies.lock().unwrap().get(text).cloned();
        let Some((delay, scripted)) = scripted else {
            return Err(RegcheckError::Transport(format!("no reply scripted for {text}")));
        };
        tokio::time::sleep(delay).await;
        match scripted {
            Scripted::Body(body) => SearchReply::from_json(body),
            Scripted::Broken => Err(RegcheckError::Transport("connection reset".into())),
        }
    }
}

#[derive(Default)]
pub struct ScriptedResources {
    texts: Mutex<HashMap<StaticResource, (Duration, Option<&'static str>)>>,
}

impl ScriptedResources {
    pub fn new() -> Self { Self::default() }

    /// `None` answers with HTTP 500.
    pub fn serve(self, resource: StaticResource, delay_ms: u64, text: Option<&'static str>) -> Self {
        self.texts.lock().unwrap().insert(resource, (Duration::from_millis(delay_ms), text));
        self
    }
}

#[async_trait]
impl StaticResources for ScriptedResources {
    async fn fetch_text(&self, resource: StaticResource) -> Result<String> {
        let served = self.texts.lock().unwrap().get(&resource).cloned();
        let (delay, text) = served.unwrap_or((Duration::ZERO, None));
        tokio::time::sleep(delay).await;
        text.map(str::to_string)
            .ok_or_else(|| RegcheckError::Status { status: 500, url: format!("{resource:?}") })
    }
}

pub struct BrokenClipboard;

#[async_trait]
impl Clipboard for BrokenClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(RegcheckError::Clipboard("permission denied".into()))
    }
}

pub const BENZENE: &str = r#"{"original":"benzene","english_name":"benzene","smiles":"c1ccccc1","regulations":[{"law":"PRTR","name":"Class 1 designated substance","description":"benzene","detected_type":"exact match"}]}"#;
pub const WATER: &str = r#"{"original":"水","english_name":"water","smiles":"O","regulations":null}"#;

pub fn app(backend: ScriptedBackend) -> RegcheckApp {
    app_with(backend, ScriptedResources::new(), Arc::new(MemoryClipboard::new()))
}

pub fn app_with(backend: ScriptedBackend, resources: ScriptedResources, clipboard: Arc<dyn Clipboard>) -> RegcheckApp {
    RegcheckApp::new(ClientConfig::default(), Arc::new(backend), Arc::new(resources), clipboard).expect("default config is valid")
}
