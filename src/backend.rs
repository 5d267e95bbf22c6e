//! Transport seams towards the resolution service.
//!
//! The coordinator and the modal only see the [`ResolutionBackend`] and
//! [`StaticResources`] traits. [`HttpBackend`] implements both on top of
//! `reqwest`; tests and embedders can plug in their own.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{RegcheckError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulationMatch {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub law: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub detected_type: String,
}

// the service fills match entries from optional lookups and may send null
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A successful lookup, normalized for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupResult {
    pub translated_name: String,
    pub structure_code: Option<String>,
    pub regulations: Vec<RegulationMatch>,
    /// Note from the service, e.g. when the structure could not be converted.
    pub message: Option<String>,
    /// The input as the service received it.
    pub original: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchReply {
    Found(LookupResult),
    /// The service understood the request but reported a failure.
    Rejected(String),
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    english_name: Option<String>,
    #[serde(default)]
    smiles: Option<String>,
    #[serde(default)]
    regulations: Option<Vec<RegulationMatch>>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

impl SearchReply {
    /// Interprets a response body of the search endpoint.
    pub fn from_json(body: &str) -> Result<Self> {
        let response: SearchResponse = serde_json::from_str(body)?;
        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Ok(SearchReply::Rejected(error));
        }
        let translated_name = response.english_name.ok_or_else(|| {
            RegcheckError::Decode("search response carries neither english_name nor error".into())
        })?;
        Ok(SearchReply::Found(LookupResult {
            translated_name,
            structure_code: response.smiles,
            // null and absent both mean "nothing matched"
            regulations: response.regulations.unwrap_or_default(),
            message: response.message,
            original: response.original,
        }))
    }
}

/// The plain-text panels served next to the lookup page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticResource {
    SupportedLaws,
    Announcements,
}

impl StaticResource {
    pub fn title(&self) -> &'static str {
        match self {
            StaticResource::SupportedLaws => "Supported regulations",
            StaticResource::Announcements => "Announcements",
        }
    }
    pub fn path<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            StaticResource::SupportedLaws => &config.laws_path,
            StaticResource::Announcements => &config.news_path,
        }
    }
}

#[async_trait]
pub trait ResolutionBackend: Send + Sync {
    /// Submits `text` for resolution. `Err` means the exchange itself failed
    /// (network, malformed body); service-side failures are `Ok(Rejected)`.
    async fn search(&self, text: &str) -> Result<SearchReply>;
}

#[async_trait]
pub trait StaticResources: Send + Sync {
    async fn fetch_text(&self, resource: StaticResource) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    search_url: String,
    laws_url: String,
    news_url: String,
}

impl HttpBackend {
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            search_url: config.url(&config.search_path),
            laws_url: config.url(StaticResource::SupportedLaws.path(config)),
            news_url: config.url(StaticResource::Announcements.path(config)),
        })
    }

    fn resource_url(&self, resource: StaticResource) -> &str {
        match resource {
            StaticResource::SupportedLaws => &self.laws_url,
            StaticResource::Announcements => &self.news_url,
        }
    }
}

#[async_trait]
impl ResolutionBackend for HttpBackend {
    async fn search(&self, text: &str) -> Result<SearchReply> {
        let response = self
            .client
            .post(&self.search_url)
            .json(&SearchRequest { text })
            .send()
            .await?;
        // the service reports rejected input with 4xx/5xx and a JSON error body,
        // so the body is interpreted whatever the status
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "search response received");
        SearchReply::from_json(&body)
    }
}

#[async_trait]
impl StaticResources for HttpBackend {
    async fn fetch_text(&self, resource: StaticResource) -> Result<String> {
        let url = self.resource_url(resource);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegcheckError::Status { status: status.as_u16(), url: url.to_string() });
        }
        Ok(response.text().await?)
    }
}
