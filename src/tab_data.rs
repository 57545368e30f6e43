/// Data structures for Consumer Rights Check
use serde::{Deserialize, Serialize};

/// Information about a browser tab, as reported by `tabs.query` / `tabs.get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
}

/// One wiki article that mentions the company
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub title: String,
    pub description: String,
    pub url: String,
    pub size: u64,
}

/// Outcome of one company lookup for a tab.
///
/// An empty `entries` list is a successful "nothing found" result,
/// never a failed lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub company_name: String,
    pub entries: Vec<Finding>,
    /// Milliseconds since the Unix epoch
    pub timestamp: f64,
}

impl LookupResult {
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }
}
