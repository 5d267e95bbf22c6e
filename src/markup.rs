//! Markup fragments for the page.
//!
//! Everything inserted into the result area or the modal body goes through
//! here. User input and service-provided strings are escaped; the only
//! unescaped markup is the fixed text defined in this crate.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::backend::LookupResult;
use crate::page::ResultView;

lazy_static! {
    static ref HTML_SPECIAL: Regex = Regex::new(r#"[&<>"']"#).unwrap();
    static ref LINE_BREAK: Regex = Regex::new(r"\r?\n").unwrap();
}

pub const TRANSLATION_NOTE: &str = "(translated by custom rules)";
pub const UNCONVERTED_STRUCTURE: &str = "Could not convert";
pub const NO_REGULATIONS: &str = "No regulations found";
pub const COMMUNICATION_ERROR: &str = "A communication error occurred.<br>Please try again.";

pub const USAGE_MARKUP: &str = r#"
<h3>Chemical Regulation Checker</h3>
<hr>
<h4>How to use</h4>
<ul>
    <li><strong>Input:</strong> Enter the substance as a Japanese systematic name, an IUPAC name or a SMILES string. (Some common names are supported too.)</li>
    <li><strong>Submit:</strong> Press the submit button to look up the laws that regulate the substance. (The result can take a while.)</li>
    <li>Japanese input is first translated to English by custom rules and then converted to SMILES, so some names may not resolve.</li>
    <li>See "Supported regulations" for the laws and substances that can currently be detected.</li>
</ul>
"#;

/// Escapes `& < > " '` for insertion into markup.
pub fn escape_html(raw: &str) -> String {
    HTML_SPECIAL
        .replace_all(raw, |caps: &Captures| match &caps[0] {
            "&" => "&amp;",
            "<" => "&lt;",
            ">" => "&gt;",
            "\"" => "&quot;",
            _ => "&#39;",
        })
        .into_owned()
}

/// Escapes plain text and turns its line breaks into `<br>`.
pub fn text_to_markup(text: &str) -> String {
    newlines_to_breaks(&escape_html(text))
}

pub fn newlines_to_breaks(text: &str) -> String {
    LINE_BREAK.replace_all(text, "<br>").into_owned()
}

pub fn loading_markup(message: &str) -> String {
    format!(
        "<div class=\"loading-container\"><div class=\"spinner\"></div><p class=\"loading-msg\">{}</p></div>",
        escape_html(message)
    )
}

pub fn error_markup(message: &str) -> String {
    format!("<p class=\"error\">Error: {}</p>", escape_html(message))
}

pub fn communication_error_markup() -> String {
    format!("<p class=\"error centered\">{COMMUNICATION_ERROR}</p>")
}

/// Builds the result area for a successful lookup of `input`.
pub fn render_result(input: &str, result: &LookupResult) -> ResultView {
    let mut markup = String::new();
    let mut text = Vec::new();

    markup.push_str(&format!("<h3>{}</h3>", escape_html(input)));
    text.push(input.to_string());

    markup.push_str(&format!(
        "<p><strong>{}</strong> <small>{TRANSLATION_NOTE}</small></p>",
        escape_html(&result.translated_name)
    ));
    text.push(format!("{} {TRANSLATION_NOTE}", result.translated_name));

    let structure = result.structure_code.as_deref().unwrap_or(UNCONVERTED_STRUCTURE);
    markup.push_str(&format!("<p><strong>SMILES:</strong> {}</p>", escape_html(structure)));
    text.push(format!("SMILES: {structure}"));

    if let Some(note) = &result.message {
        markup.push_str(&format!("<p class=\"note\"><small>{}</small></p>", escape_html(note)));
        text.push(note.clone());
    }

    if result.regulations.is_empty() {
        markup.push_str(&format!("<p class=\"clear\"><small>{NO_REGULATIONS}</small></p>"));
        text.push(NO_REGULATIONS.to_string());
    } else {
        let header = format!("Detected regulations ({})", result.regulations.len());
        markup.push_str(&format!("<h4 class=\"detected\">{header}</h4><ul>"));
        text.push(header);
        for reg in &result.regulations {
            markup.push_str(&format!(
                "<li><strong>{}</strong> : {} <small>{} : {}</small></li>",
                escape_html(&reg.law),
                escape_html(&reg.name),
                escape_html(&reg.description),
                escape_html(&reg.detected_type),
            ));
            text.push(format!("{} : {} {} : {}", reg.law, reg.name, reg.description, reg.detected_type));
        }
        markup.push_str("</ul>");
    }

    ResultView { markup, text: text.join("\n") }
}
