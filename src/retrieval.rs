//! Document ingestion and context retrieval.
//!
//! Pages are collected into a [`DocumentArena`] owned by one quiz session, and a
//! retriever is built from a snapshot of that arena. Nothing here is global.

use crate::core::ContextRetriever;
use crate::error::RetrievalError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Passages returned per query unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 4;

/// One page of an ingested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub source: String,
    /// 1-based
    pub page_number: usize,
    pub content: String,
}

/// Turns files into ordered page records.
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    async fn ingest(&self, files: &[PathBuf]) -> Result<Vec<PageRecord>, RetrievalError>;
}

/// Reads UTF-8 text files, splitting pages on form feeds.
#[derive(Debug, Clone, Default)]
pub struct PlainTextStore;

#[async_trait]
impl DocumentStore for PlainTextStore {
    #[instrument(target = "quizzify::retrieval", skip(self, files), fields(files = files.len()))]
    async fn ingest(&self, files: &[PathBuf]) -> Result<Vec<PageRecord>, RetrievalError> {
        let mut pages = Vec::new();
        for path in files {
            let text = tokio::fs::read_to_string(path).await?;
            let source = display_name(path);
            let before = pages.len();
            pages.extend(
                text.split('\u{c}')
                    .map(str::trim)
                    .filter(|page| !page.is_empty())
                    .enumerate()
                    .map(|(i, content)| PageRecord {
                        source: source.clone(),
                        page_number: i + 1,
                        content: content.to_string(),
                    }),
            );
            info!(target: "quizzify::retrieval", %source, pages = pages.len() - before, "Processed file");
        }
        Ok(pages)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Pages ingested during one session.
#[derive(Debug, Clone, Default)]
pub struct DocumentArena {
    pages: Vec<PageRecord>,
}

impl DocumentArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pages(&mut self, pages: impl IntoIterator<Item = PageRecord>) {
        self.pages.extend(pages);
    }

    /// Ingest `files` through `store` and keep the resulting pages.
    pub async fn ingest<S: DocumentStore + ?Sized>(&mut self, store: &S, files: &[PathBuf]) -> Result<usize, RetrievalError> {
        let pages = store.ingest(files).await?;
        let added = pages.len();
        self.add_pages(pages);
        Ok(added)
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Retriever over a snapshot of the pages ingested so far.
    pub fn retriever(&self, top_k: usize) -> KeywordRetriever {
        KeywordRetriever::new(self.pages.clone(), top_k)
    }
}

/// Ranks pages by how many topic terms they contain.
///
/// Ties keep ingestion order. When no page shares a term with the topic the
/// first `top_k` pages are returned so the prompt still carries context.
#[derive(Debug, Clone)]
pub struct KeywordRetriever {
    pages: Arc<Vec<PageRecord>>,
    top_k: usize,
}

impl KeywordRetriever {
    pub fn new(pages: Vec<PageRecord>, top_k: usize) -> Self {
        Self { pages: Arc::new(pages), top_k: top_k.max(1) }
    }

    fn rank(&self, topic: &str) -> Vec<&PageRecord> {
        let terms: HashSet<String> = tokenize(topic).collect();
        let mut scored: Vec<(usize, &PageRecord)> = self
            .pages
            .iter()
            .map(|page| (tokenize(&page.content).filter(|t| terms.contains(t)).count(), page))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(self.top_k).map(|(_, page)| page).collect()
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 1)
        .map(str::to_lowercase)
}

#[async_trait]
impl ContextRetriever for KeywordRetriever {
    async fn retrieve(&self, topic: &str) -> Result<Vec<String>, RetrievalError> {
        if self.pages.is_empty() {
            return Err(RetrievalError::EmptyIndex);
        }
        let passages: Vec<String> = self.rank(topic).into_iter().map(|p| p.content.clone()).collect();
        debug!(target: "quizzify::retrieval", topic, passages = passages.len(), "Retrieved context");
        Ok(passages)
    }

    fn clone_box(&self) -> Box<dyn ContextRetriever> {
        Box::new(self.clone())
    }
}

/// Returns the same passages for every topic.
#[derive(Debug, Clone, Default)]
pub struct StaticRetriever {
    passages: Vec<String>,
}

impl StaticRetriever {
    pub fn new<I, S>(passages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { passages: passages.into_iter().map(Into::into).collect() }
    }
}

#[async_trait]
impl ContextRetriever for StaticRetriever {
    async fn retrieve(&self, _topic: &str) -> Result<Vec<String>, RetrievalError> {
        Ok(self.passages.clone())
    }

    fn clone_box(&self) -> Box<dyn ContextRetriever> {
        Box::new(self.clone())
    }
}
