//! Source adapter contract (spec §4.2): a pluggable module mapping a query
//! string to a lazy, one-shot sequence of [`Publication`] records from one
//! scientific index.

use std::sync::Arc;

use bibscope_common::types::Publication;
use futures::stream::BoxStream;
use thiserror::Error;

/// A single adapter-reported failure (spec §4.2, §7 `SourceError`).
/// Adapters must report failures this way rather than returning a silently
/// empty result, so the pipeline can record a partial failure.
#[derive(Debug, Clone, Error)]
#[error("source '{source_id}' failed: {detail}")]
pub struct SourceError {
    pub source_id: String,
    pub detail: String,
}

impl SourceError {
    pub fn new(source_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            detail: detail.into(),
        }
    }
}

/// Inclusive year bound on a search (spec §4.2).
#[derive(Clone, Copy, Debug, Default)]
pub struct YearRange {
    pub from: Option<i32>,
    pub to: Option<i32>,
}

/// A lazy, non-restartable sequence of search results: each item is either
/// a successfully normalized record or a recoverable per-record failure.
pub type SearchStream<'a> = BoxStream<'a, Result<Publication, SourceError>>;

/// One pluggable publication source (spec §4.2). A new call to `search`
/// starts a new search; the returned stream cannot be restarted or reused.
///
/// Boxed-future-free on the trait itself: `search` returns a stream, not a
/// future, so implementors drive their own pagination lazily as the caller
/// polls the stream.
pub trait SourceAdapter: Send + Sync {
    /// Stable adapter identifier, used as the `source` tag on produced
    /// records and as the rate-limiter bucket key.
    fn id(&self) -> &str;

    /// Minimum seconds between this adapter's outbound calls (spec §4.2).
    fn rate_limit_s(&self) -> f64;

    fn search<'a>(
        &'a self,
        query: &'a str,
        max_results: usize,
        year_range: Option<YearRange>,
    ) -> SearchStream<'a>;
}

/// A shared, object-safe source adapter, as stored in the pipeline's
/// registered-adapter table.
pub type BoxedAdapter = Arc<dyn SourceAdapter>;

/// A synthetic in-memory adapter for tests and local exploration (spec
/// SPEC_FULL.md §4.2). Not a vendor integration — the real ACM/SAGE/
/// ScienceDirect adapters are external collaborators (Non-goal) and are
/// expected to implement [`SourceAdapter`] the same way.
pub struct FixtureSourceAdapter {
    id: String,
    rate_limit_s: f64,
    records: Vec<Publication>,
    /// When set, every call to `search` fails with this detail instead of
    /// yielding records — used to exercise the partial-source-failure path.
    fail_with: Option<String>,
}

impl FixtureSourceAdapter {
    pub fn new(id: impl Into<String>, records: Vec<Publication>) -> Self {
        Self {
            id: id.into(),
            rate_limit_s: 0.0,
            records,
            fail_with: None,
        }
    }

    pub fn with_rate_limit(mut self, rate_limit_s: f64) -> Self {
        self.rate_limit_s = rate_limit_s;
        self
    }

    pub fn failing(mut self, detail: impl Into<String>) -> Self {
        self.fail_with = Some(detail.into());
        self
    }
}

impl SourceAdapter for FixtureSourceAdapter {
    fn id(&self) -> &str {
        &self.id
    }

    fn rate_limit_s(&self) -> f64 {
        self.rate_limit_s
    }

    fn search<'a>(
        &'a self,
        query: &'a str,
        max_results: usize,
        year_range: Option<YearRange>,
    ) -> SearchStream<'a> {
        if let Some(detail) = &self.fail_with {
            let err = SourceError::new(self.id.clone(), detail.clone());
            return Box::pin(futures::stream::once(async move { Err(err) }));
        }

        let query_lower = query.to_lowercase();
        let matches: Vec<Result<Publication, SourceError>> = self
            .records
            .iter()
            .filter(|p| {
                query_lower.is_empty()
                    || p.title.to_lowercase().contains(&query_lower)
                    || p.abstract_text
                        .as_deref()
                        .is_some_and(|a| a.to_lowercase().contains(&query_lower))
            })
            .filter(|p| match year_range {
                None => true,
                Some(range) => {
                    let year = p.year;
                    let from_ok = match range.from {
                        None => true,
                        Some(from) => year.is_some_and(|y| y >= from),
                    };
                    let to_ok = match range.to {
                        None => true,
                        Some(to) => year.is_some_and(|y| y <= to),
                    };
                    from_ok && to_ok
                }
            })
            .take(max_results)
            .cloned()
            .map(Ok)
            .collect();

        Box::pin(futures::stream::iter(matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn sample(title: &str, year: i32) -> Publication {
        let mut p = Publication::new(title, "fixture");
        p.year = Some(year);
        p
    }

    #[tokio::test]
    async fn filters_by_query_substring() {
        let adapter = FixtureSourceAdapter::new(
            "fixture",
            vec![sample("Diffusion Models", 2021), sample("Transformers Rise", 2019)],
        );
        let results: Vec<_> = adapter.search("diffusion", 10, None).collect().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].as_ref().unwrap().title.contains("Diffusion"));
    }

    #[tokio::test]
    async fn filters_by_year_range() {
        let adapter = FixtureSourceAdapter::new(
            "fixture",
            vec![sample("A", 2018), sample("B", 2021), sample("C", 2023)],
        );
        let range = YearRange { from: Some(2020), to: Some(2022) };
        let results: Vec<_> = adapter.search("", 10, Some(range)).collect().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().title, "B");
    }

    #[tokio::test]
    async fn failing_adapter_reports_a_source_error_not_an_empty_result() {
        let adapter = FixtureSourceAdapter::new("fixture", vec![sample("A", 2020)]).failing("timeout");
        let results: Vec<_> = adapter.search("a", 10, None).collect().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[tokio::test]
    async fn respects_max_results() {
        let adapter = FixtureSourceAdapter::new(
            "fixture",
            (0..10).map(|i| sample(&format!("Paper {i}"), 2020)).collect(),
        );
        let results: Vec<_> = adapter.search("", 3, None).collect().await;
        assert_eq!(results.len(), 3);
    }
}
