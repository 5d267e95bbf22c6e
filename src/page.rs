//! Headless model of the lookup page.
//!
//! The page is the set of display slots the coordinator writes to: the result
//! area, the copy button and the queue of blocking alerts. A renderer (browser
//! glue, terminal front end, a test) reads a [`Page`] snapshot and shows it.

use crate::session::Generation;

/// Rendered lookup result: the markup shown in the result area and the plain
/// text a copy puts on the clipboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub markup: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResultArea {
    #[default]
    Empty,
    /// A lookup is in flight; `message` is the loading line currently shown.
    Loading { generation: Generation, message: String },
    Rendered(ResultView),
    /// Application or communication error, as markup.
    Failed(String),
}

impl ResultArea {
    pub fn markup(&self) -> String {
        match self {
            ResultArea::Empty => String::new(),
            ResultArea::Loading { message, .. } => crate::markup::loading_markup(message),
            ResultArea::Rendered(view) => view.markup.clone(),
            ResultArea::Failed(markup) => markup.clone(),
        }
    }
    pub fn is_loading(&self) -> bool {
        matches!(self, ResultArea::Loading { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyButton {
    pub visible: bool,
    pub label: String,
    /// Set while the "copied" confirmation label is showing.
    pub copied: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub result: ResultArea,
    pub copy_button: CopyButton,
    pub alerts: Vec<String>,
}

impl Page {
    pub fn new(copy_label: &str) -> Self {
        Self {
            result: ResultArea::Empty,
            copy_button: CopyButton { visible: false, label: copy_label.to_string(), copied: false },
            alerts: Vec::new(),
        }
    }

    /// The text a copy should place on the clipboard, if a result is showing.
    pub fn result_text(&self) -> Option<&str> {
        match &self.result {
            ResultArea::Rendered(view) => Some(&view.text),
            _ => None,
        }
    }

    /// Hands the pending alerts to the caller, leaving the queue empty.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }
}
