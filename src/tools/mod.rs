// ABOUTME: Built-in lookup tools and the search backends behind them.
// ABOUTME: Includes web search (DuckDuckGo) and research paper search (arXiv).

mod paper_search;
mod web_search;

pub use paper_search::{
    Arxiv, Paper, PaperSearchBackend, PaperSearchTool, SUMMARY_LIMIT, truncate_summary,
};
pub use web_search::{DuckDuckGo, SearchResult, WebSearchBackend, WebSearchTool};
