//! Best-effort definition lookup for the word being practiced.
//!
//! Lookups run on a small tokio runtime off the input thread and report back
//! through the same event channel as keystrokes, so the drill sees each
//! completion as just another event. Every failure collapses to
//! [`DefinitionResult::Unavailable`].

use crate::runtime::SpellEvent;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DefinitionResult {
    Text(String),
    /// Fetch failed or the dictionary has nothing for the word.
    Unavailable,
}

#[async_trait]
pub trait DefinitionLookup: Send + Sync {
    async fn fetch(&self, word: &str) -> DefinitionResult;
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    meanings: Vec<Meaning>,
}

#[derive(Debug, Deserialize)]
struct Meaning {
    #[serde(default)]
    definitions: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(default)]
    definition: String,
}

fn first_definition(entries: &[Entry]) -> Option<String> {
    entries
        .iter()
        .flat_map(|e| &e.meanings)
        .flat_map(|m| &m.definitions)
        .map(|s| s.definition.trim())
        .find(|d| !d.is_empty())
        .map(str::to_owned)
}

/// Client for dictionaryapi.dev style endpoints (`GET {base}/{word}`).
pub struct DictionaryApiLookup {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl DictionaryApiLookup {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url_for(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(word)
        )
    }

    async fn try_fetch(&self, word: &str) -> reqwest::Result<Option<String>> {
        let response = self
            .client
            .get(self.url_for(word))
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            log::debug!("no definition for {word:?}: HTTP {}", response.status());
            return Ok(None);
        }

        let entries: Vec<Entry> = response.json().await?;
        Ok(first_definition(&entries))
    }
}

impl Default for DictionaryApiLookup {
    fn default() -> Self {
        Self::new(DEFAULT_DICTIONARY_URL)
    }
}

#[async_trait]
impl DefinitionLookup for DictionaryApiLookup {
    async fn fetch(&self, word: &str) -> DefinitionResult {
        match self.try_fetch(word).await {
            Ok(Some(text)) => DefinitionResult::Text(text),
            Ok(None) => DefinitionResult::Unavailable,
            Err(e) => {
                log::debug!("definition lookup for {word:?} failed: {e}");
                DefinitionResult::Unavailable
            }
        }
    }
}

/// Fixed word -> definition table.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    entries: HashMap<String, String>,
}

impl StaticLookup {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl DefinitionLookup for StaticLookup {
    async fn fetch(&self, word: &str) -> DefinitionResult {
        self.entries
            .get(word)
            .map(|d| DefinitionResult::Text(d.clone()))
            .unwrap_or(DefinitionResult::Unavailable)
    }
}

/// Fire-and-forget entry point used by the session loop.
pub trait LookupDispatch {
    fn dispatch(&self, word: String);
}

/// Dispatcher that never looks anything up.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLookup;

impl LookupDispatch for NoLookup {
    fn dispatch(&self, word: String) {
        log::trace!("definitions disabled, skipping {word:?}");
    }
}

/// Runs lookups on a background runtime and posts
/// [`SpellEvent::Definition`] when each one resolves.
///
/// Dropping the service abandons in-flight requests; their results are
/// never delivered.
pub struct LookupService {
    runtime: Option<tokio::runtime::Runtime>,
    lookup: Arc<dyn DefinitionLookup>,
    events: Sender<SpellEvent>,
}

impl LookupService {
    pub fn new(
        lookup: Arc<dyn DefinitionLookup>,
        events: Sender<SpellEvent>,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("spelldrill-lookup")
            .enable_all()
            .build()?;
        Ok(Self {
            runtime: Some(runtime),
            lookup,
            events,
        })
    }
}

impl LookupDispatch for LookupService {
    fn dispatch(&self, word: String) {
        let Some(runtime) = &self.runtime else {
            return;
        };
        let lookup = Arc::clone(&self.lookup);
        let events = self.events.clone();
        runtime.spawn(async move {
            let result = lookup.fetch(&word).await;
            // Receiver gone means the session is over.
            let _ = events.send(SpellEvent::Definition { word, result });
        });
    }
}

impl Drop for LookupService {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
