//! Paginated list envelope.

use serde::{Deserialize, Serialize};

/// A page of results from a list endpoint.
///
/// List endpoints answer `{"count", "next", "previous", "results"}`; only
/// `results` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of matching records, when the backend reports it.
    #[serde(default)]
    pub count: Option<u64>,
    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Wrap records as a single complete page.
    #[must_use]
    pub fn of(results: Vec<T>) -> Self {
        Self {
            count: Some(results.len() as u64),
            next: None,
            previous: None,
            results,
        }
    }

    /// Whether there is a page after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_requires_results_only() {
        let page: Page<u32> = serde_json::from_str(r#"{"results": [1, 2]}"#).expect("page");
        assert_eq!(page.results, vec![1, 2]);
        assert_eq!(page.count, None);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_without_results_is_rejected() {
        assert!(serde_json::from_str::<Page<u32>>(r#"{"count": 0}"#).is_err());
    }
}
