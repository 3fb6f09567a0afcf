// ABOUTME: WebSearchTool - general web lookup returning title/link/snippet records.
// ABOUTME: Backed by DuckDuckGo HTML search or any WebSearchBackend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::ToolError;
use crate::llm::{ParameterSpec, ToolDefinition};
use crate::tool::{SearchArgs, Tool, ToolResult, WebRecord};

const DUCKDUCKGO_URL: &str = "https://html.duckduckgo.com/html/";

/// A single search hit as reported by a backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A provider of web search hits.
#[async_trait]
pub trait WebSearchBackend: Send + Sync {
    /// Return at most `max_results` hits in provider order.
    async fn search(&self, query: &str, max_results: usize)
    -> Result<Vec<SearchResult>, ToolError>;
}

/// Tool for performing web searches.
pub struct WebSearchTool {
    backend: Arc<dyn WebSearchBackend>,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearchTool {
    pub const NAME: &'static str = "web_search";

    /// Results returned when the caller does not ask for a count.
    pub const DEFAULT_MAX_RESULTS: usize = 5;

    /// Create a WebSearchTool backed by DuckDuckGo.
    pub fn new() -> Self {
        Self::with_backend(Arc::new(DuckDuckGo::new()))
    }

    /// Create with a custom backend.
    pub fn with_backend(backend: Arc<dyn WebSearchBackend>) -> Self {
        Self { backend }
    }

    /// Search the web.
    ///
    /// Never fails: an empty query or a backend fault yields a single error
    /// record.
    pub async fn search(&self, query: &str, max_results: Option<usize>) -> ToolResult {
        if query.trim().is_empty() {
            return ToolResult::error("Empty search query");
        }
        let max_results = max_results.unwrap_or(Self::DEFAULT_MAX_RESULTS);

        match self.backend.search(query, max_results).await {
            Ok(hits) => {
                debug!(%query, hits = hits.len(), "web search finished");
                ToolResult::web(hits.into_iter().take(max_results).map(|hit| WebRecord {
                    title: hit.title,
                    link: hit.url,
                    snippet: hit.snippet,
                }))
            }
            Err(e) => {
                warn!(%query, error = %e, "web search failed");
                ToolResult::error(format!("Web search failed: {}", e))
            }
        }
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            Self::NAME,
            "Search the web for general information, news, current events, and how-to guides.",
        )
        .required_param("query", ParameterSpec::string("The web search query."))
        .param(
            "max_results",
            ParameterSpec::integer("Max results.").default_value(5),
        )
    }

    async fn execute(&self, args: SearchArgs) -> ToolResult {
        self.search(&args.query, Some(args.max_results)).await
    }
}

/// DuckDuckGo HTML search backend.
pub struct DuckDuckGo {
    client: reqwest::Client,
    base_url: String,
}

impl Default for DuckDuckGo {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGo {
    /// Create a new DuckDuckGo backend.
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (compatible; scout/0.1.0)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client)
    }

    /// Create with a custom reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DUCKDUCKGO_URL.to_string(),
        }
    }

    /// Send searches to another endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Parse DuckDuckGo HTML search results.
    pub(crate) fn parse_results(html: &str) -> Vec<SearchResult> {
        let mut results = Vec::new();
        let mut remaining = html;

        while let Some(result_start) = remaining.find("class=\"result__a\"") {
            remaining = &remaining[result_start..];

            let Some(url) = Self::extract_href(remaining) else {
                remaining = &remaining[1..];
                continue;
            };

            // Title is the anchor text.
            let title = remaining
                .find('>')
                .map(|gt| &remaining[gt + 1..])
                .and_then(|after| after.find("</a>").map(|end| strip_tags(&after[..end])))
                .unwrap_or_default();

            // The snippet belongs to this result only if it comes before the next one.
            let next_result = remaining[1..]
                .find("class=\"result__a\"")
                .map_or(remaining.len(), |i| i + 1);
            let snippet = remaining[..next_result]
                .find("class=\"result__snippet\"")
                .map(|start| &remaining[start..])
                .and_then(|s| s.find('>').map(|gt| &s[gt + 1..]))
                .and_then(|after| {
                    after
                        .find("</a>")
                        .or_else(|| after.find("</"))
                        .map(|end| strip_tags(&after[..end]))
                })
                .unwrap_or_default();

            if !url.is_empty() {
                results.push(SearchResult {
                    title: title.trim().to_string(),
                    url,
                    snippet: snippet.trim().to_string(),
                });
            }

            remaining = &remaining[1..];
        }

        results
    }

    /// Extract the target URL, unwrapping DuckDuckGo's `uddg=` redirect.
    fn extract_href(fragment: &str) -> Option<String> {
        let href_start = fragment.find("href=\"")?;
        let href_content = &fragment[href_start + 6..];
        let raw_url = &href_content[..href_content.find('"')?];

        let Some(uddg_pos) = raw_url.find("uddg=") else {
            return Some(decode_entities(raw_url));
        };
        let encoded = &raw_url[uddg_pos + 5..];
        let encoded = encoded.split("&amp;").next().unwrap_or(encoded);
        let encoded = encoded.split('&').next().unwrap_or(encoded);
        Some(
            urlencoding::decode(encoded)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| encoded.to_string()),
        )
    }
}

#[async_trait]
impl WebSearchBackend for DuckDuckGo {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, ToolError> {
        let url = format!("{}?q={}", self.base_url, urlencoding::encode(query));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ToolError::Status(response.status().as_u16()));
        }

        let html = response.text().await?;
        let mut results = Self::parse_results(&html);
        results.truncate(max_results);
        Ok(results)
    }
}

/// Strip HTML tags and decode common entities.
pub(crate) fn strip_tags(html: &str) -> String {
    let mut text = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    decode_entities(&text)
}

/// Decode the handful of entities search pages and feeds actually use.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const DDG_FIXTURE: &str = r#"
<div class="result results_links">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.iter.org%2Fnews&amp;rut=abc">ITER <b>Fusion</b> News</a>
  </h2>
  <a class="result__snippet" href="//duckduckgo.com/l/?uddg=x">Latest updates on <b>fusion</b> energy &amp; plasma.</a>
</div>
<div class="result results_links">
  <h2 class="result__title">
    <a rel="nofollow" class="result__a" href="https://example.org/plain">Plain link</a>
  </h2>
</div>
"#;

    struct CountingBackend {
        calls: AtomicUsize,
        outcome: fn() -> Result<Vec<SearchResult>, ToolError>,
    }

    #[async_trait]
    impl WebSearchBackend for CountingBackend {
        async fn search(&self, _: &str, _: usize) -> Result<Vec<SearchResult>, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn three_hits() -> Result<Vec<SearchResult>, ToolError> {
        Ok((1..=3)
            .map(|i| SearchResult {
                title: format!("Result {}", i),
                url: format!("https://example.com/{}", i),
                snippet: String::new(),
            })
            .collect())
    }

    fn network_down() -> Result<Vec<SearchResult>, ToolError> {
        Err(ToolError::Execution(anyhow::anyhow!("connection refused")))
    }

    fn tool_with(
        outcome: fn() -> Result<Vec<SearchResult>, ToolError>,
    ) -> (WebSearchTool, Arc<CountingBackend>) {
        let backend = Arc::new(CountingBackend {
            calls: AtomicUsize::new(0),
            outcome,
        });
        (WebSearchTool::with_backend(backend.clone()), backend)
    }

    #[test]
    fn test_strip_tags() {
        let html = "<b>Bold</b> and <i>italic</i> &amp; more";
        assert_eq!(strip_tags(html), "Bold and italic & more");
    }

    #[test]
    fn test_parse_empty_results() {
        let results = DuckDuckGo::parse_results("<html><body>No results</body></html>");
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results() {
        let results = DuckDuckGo::parse_results(DDG_FIXTURE);
        assert_eq!(results.len(), 2);

        assert_eq!(results[0].title, "ITER Fusion News");
        assert_eq!(results[0].url, "https://www.iter.org/news");
        assert_eq!(results[0].snippet, "Latest updates on fusion energy & plasma.");

        assert_eq!(results[1].title, "Plain link");
        assert_eq!(results[1].url, "https://example.org/plain");
        assert_eq!(results[1].snippet, "");
    }

    #[tokio::test]
    async fn test_empty_query_never_hits_backend() {
        let (tool, backend) = tool_with(three_hits);
        for query in ["", "   ", "\t\n"] {
            let result = tool.search(query, None).await;
            assert_eq!(result.error_message(), Some("Empty search query"));
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_results_are_capped_in_order() {
        let (tool, _) = tool_with(three_hits);
        let result = tool.search("rust", Some(2)).await;
        assert_eq!(
            result,
            ToolResult::web(vec![
                WebRecord {
                    title: "Result 1".into(),
                    link: "https://example.com/1".into(),
                    snippet: String::new(),
                },
                WebRecord {
                    title: "Result 2".into(),
                    link: "https://example.com/2".into(),
                    snippet: String::new(),
                },
            ])
        );
    }

    #[tokio::test]
    async fn test_backend_failure_becomes_error_record() {
        let (tool, _) = tool_with(network_down);
        let result = tool.search("rust", None).await;
        assert_eq!(
            result.error_message(),
            Some("Web search failed: connection refused")
        );
    }

    #[tokio::test]
    async fn test_duckduckgo_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/html/")
            .match_query(mockito::Matcher::UrlEncoded(
                "q".into(),
                "fusion energy".into(),
            ))
            .with_status(200)
            .with_body(DDG_FIXTURE)
            .create_async()
            .await;

        let backend = DuckDuckGo::new().with_base_url(format!("{}/html/", server.url()));
        let hits = backend.search("fusion energy", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].url, "https://www.iter.org/news");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_duckduckgo_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/html/")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let tool = WebSearchTool::with_backend(Arc::new(
            DuckDuckGo::new().with_base_url(format!("{}/html/", server.url())),
        ));
        let result = tool.search("rust", None).await;
        assert_eq!(
            result.error_message(),
            Some("Web search failed: unexpected status 503")
        );
    }
}
