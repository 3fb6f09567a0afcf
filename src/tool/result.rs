// ABOUTME: Defines the ToolResult type - an ordered list of result records
// ABOUTME: that is either a set of hits or exactly one error record.

use serde::{Deserialize, Serialize};

/// A single web search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebRecord {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

/// A single academic paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    pub title: String,
    pub authors: Vec<String>,
    pub summary: String,
    /// Publication date as `YYYY-MM-DD`.
    pub published: String,
    pub link: String,
    pub pdf_url: Option<String>,
}

/// One element of a tool result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultRecord {
    Error { error: String },
    Paper(PaperRecord),
    Web(WebRecord),
}

/// Result of a tool execution, serialized as a JSON array of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolResult {
    records: Vec<ResultRecord>,
}

impl ToolResult {
    /// Create a result holding a single error record.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            records: vec![ResultRecord::Error {
                error: message.into(),
            }],
        }
    }

    /// Create a result from web hits.
    pub fn web(hits: impl IntoIterator<Item = WebRecord>) -> Self {
        Self {
            records: hits.into_iter().map(ResultRecord::Web).collect(),
        }
    }

    /// Create a result from papers.
    pub fn papers(papers: impl IntoIterator<Item = PaperRecord>) -> Self {
        Self {
            records: papers.into_iter().map(ResultRecord::Paper).collect(),
        }
    }

    /// The records in order.
    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records at all.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The error message, if this result is an error.
    pub fn error_message(&self) -> Option<&str> {
        match self.records.as_slice() {
            [ResultRecord::Error { error }] => Some(error),
            _ => None,
        }
    }

    /// Whether this result is an error.
    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }

    /// Serialize to the JSON text fed back to the model.
    pub fn to_json(&self) -> String {
        // Records are plain strings and vectors; serialization cannot fail.
        serde_json::to_string(&self.records).unwrap_or_else(|_| "[]".to_string())
    }
}
