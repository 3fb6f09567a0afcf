// ABOUTME: PaperSearchTool - academic paper lookup returning trimmed paper records.
// ABOUTME: Backed by the arXiv Atom API or any PaperSearchBackend.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use tracing::{debug, warn};

use super::web_search::decode_entities;
use crate::error::ToolError;
use crate::llm::{ParameterSpec, ToolDefinition};
use crate::tool::{PaperRecord, SearchArgs, Tool, ToolResult};

const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";
const ARXIV_ERROR_PATH: &str = "arxiv.org/api/errors";

/// Summaries longer than this many characters are cut.
pub const SUMMARY_LIMIT: usize = 300;

/// A paper as reported by a backend, before trimming.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paper {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    /// Publication timestamp as sent by the provider (RFC 3339 for arXiv).
    pub published: String,
    pub entry_id: String,
    pub pdf_url: Option<String>,
}

/// A provider of academic papers, ranked by relevance.
#[async_trait]
pub trait PaperSearchBackend: Send + Sync {
    /// Return at most `max_results` papers, most relevant first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>, ToolError>;
}

/// Tool for searching research papers.
pub struct PaperSearchTool {
    backend: Arc<dyn PaperSearchBackend>,
}

impl Default for PaperSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PaperSearchTool {
    pub const NAME: &'static str = "research_paper_search";

    /// Papers returned when the caller does not ask for a count.
    pub const DEFAULT_MAX_RESULTS: usize = 1;

    /// Create a PaperSearchTool backed by arXiv.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(Arxiv::new()))
    }

    /// Create with a custom backend.
    pub fn with_backend(backend: Arc<dyn PaperSearchBackend>) -> Self {
        Self { backend }
    }

    /// Search academic papers.
    ///
    /// Never fails: an empty query or a backend fault yields a single error
    /// record. Papers with an unreadable publication date are left out.
    pub async fn search(&self, query: &str, max_results: Option<usize>) -> ToolResult {
        if query.trim().is_empty() {
            return ToolResult::error("Empty research query");
        }
        let max_results = max_results.unwrap_or(Self::DEFAULT_MAX_RESULTS);

        match self.backend.search(query, max_results).await {
            Ok(papers) => {
                let records: Vec<PaperRecord> = papers
                    .into_iter()
                    .take(max_results)
                    .filter_map(|paper| match to_record(paper) {
                        Ok(record) => Some(record),
                        Err(e) => {
                            warn!(%query, error = %e, "skipping unreadable paper");
                            None
                        }
                    })
                    .collect();
                debug!(%query, papers = records.len(), "paper search finished");
                ToolResult::papers(records)
            }
            Err(e) => {
                warn!(%query, error = %e, "paper search failed");
                ToolResult::error(format!("Research paper search failed: {}", e))
            }
        }
    }
}

#[async_trait]
impl Tool for PaperSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "Search academic research papers on arXiv for scientific or technical topics.",
        )
        .required_param("query", ParameterSpec::string("Research topic or keywords."))
        .param(
            "max_results",
            ParameterSpec::integer("Max papers.").default_value(5),
        )
    }

    fn notification(&self, query: &str) -> String {
        format!("Using the {} tool on: '{}'", Self::NAME, query)
    }

    async fn execute(&self, args: SearchArgs) -> ToolResult {
        self.search(&args.query, Some(args.max_results)).await
    }
}

fn to_record(paper: Paper) -> Result<PaperRecord, ToolError> {
    Ok(PaperRecord {
        published: normalize_date(&paper.published)?,
        summary: truncate_summary(&paper.summary),
        title: paper.title,
        authors: paper.authors,
        link: paper.entry_id,
        pdf_url: paper.pdf_url,
    })
}

/// Cut a summary to [`SUMMARY_LIMIT`] characters, marking the cut with `...`.
pub fn truncate_summary(summary: &str) -> String {
    match summary.char_indices().nth(SUMMARY_LIMIT) {
        Some((cut, _)) => format!("{}...", &summary[..cut]),
        None => summary.to_string(),
    }
}

/// Normalize a provider timestamp to `YYYY-MM-DD`.
fn normalize_date(raw: &str) -> Result<String, ToolError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.format("%Y-%m-%d").to_string());
    }
    chrono::NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| ToolError::Parse(format!("invalid publication date '{}'", raw)))
}

/// arXiv Atom API backend.
pub struct Arxiv {
    client: reqwest::Client,
    base_url: String,
}

impl Default for Arxiv {
    fn default() -> Self {
        Self::new()
    }
}

impl Arxiv {
    /// Create a new arXiv backend.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("scout/0.1.0")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client)
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: ARXIV_API_URL.to_string(),
        }
    }

    /// Send queries to another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse the entries of an arXiv Atom feed.
    pub(crate) fn parse_feed(xml: &str) -> Result<Vec<Paper>, ToolError> {
        let mut papers = Vec::new();
        let mut remaining = xml;

        while let Some(start) = remaining.find("<entry>") {
            let body = &remaining[start + "<entry>".len()..];
            let end = body
                .find("</entry>")
                .ok_or_else(|| ToolError::Parse("unterminated <entry>".to_string()))?;
            let entry = &body[..end];
            remaining = &body[end + "</entry>".len()..];

            let entry_id = element_text(entry, "id")
                .ok_or_else(|| ToolError::Parse("entry without <id>".to_string()))?;
            // arXiv reports bad queries as a feed whose only entry is the error.
            if entry_id.contains(ARXIV_ERROR_PATH) {
                let message = element_text(entry, "summary").unwrap_or(entry_id);
                return Err(ToolError::Provider(message));
            }
            let authors = split_elements(entry, "author")
                .filter_map(|author| element_text(author, "name"))
                .collect();

            papers.push(Paper {
                title: element_text(entry, "title").unwrap_or_default(),
                authors,
                summary: element_text(entry, "summary").unwrap_or_default(),
                published: element_text(entry, "published").unwrap_or_default(),
                entry_id,
                pdf_url: pdf_link(entry),
            });
        }

        Ok(papers)
    }
}

#[async_trait]
impl PaperSearchBackend for Arxiv {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<Paper>, ToolError> {
        let max_results = max_results.to_string();
        let search_query = format!("all:{}", query);
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("search_query", search_query.as_str()),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", "relevance"),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ToolError::Status(response.status().as_u16()));
        }

        let xml = response.text().await?;
        Self::parse_feed(&xml)
    }
}

/// Iterate over the inner text of every `<tag ...>...</tag>` in `xml`.
fn split_elements<'a>(xml: &'a str, tag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let mut remaining = xml;

    std::iter::from_fn(move || {
        loop {
            let start = remaining.find(&open)?;
            let after_name = &remaining[start + open.len()..];
            // Skip longer tag names sharing the prefix, e.g. <author> vs <authors>.
            if !after_name.starts_with(['>', ' ', '\n', '\t', '\r', '/']) {
                remaining = after_name;
                continue;
            }
            let gt = after_name.find('>')?;
            if after_name[..gt].ends_with('/') {
                remaining = &after_name[gt + 1..];
                return Some("");
            }
            let content = &after_name[gt + 1..];
            let end = content.find(&close)?;
            remaining = &content[end + close.len()..];
            return Some(&content[..end]);
        }
    })
}

/// Whitespace-collapsed, entity-decoded text of the first `<tag>` element.
fn element_text(xml: &str, tag: &str) -> Option<String> {
    let raw = split_elements(xml, tag).next()?;
    let text = decode_entities(&raw.split_whitespace().collect::<Vec<_>>().join(" "));
    Some(text)
}

/// The href of the `<link title="pdf" .../>` element, if any.
fn pdf_link(entry: &str) -> Option<String> {
    let mut remaining = entry;
    while let Some(start) = remaining.find("<link") {
        let tag = &remaining[start..];
        let end = tag.find('>')?;
        let tag_text = &tag[..end];
        remaining = &tag[end..];

        if attribute(tag_text, "title").as_deref() == Some("pdf") {
            return attribute(tag_text, "href");
        }
    }
    None
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let marker = format!(" {}=\"", name);
    let start = tag.find(&marker)? + marker.len();
    let len = tag[start..].find('"')?;
    Some(decode_entities(&tag[start..start + len]))
}
