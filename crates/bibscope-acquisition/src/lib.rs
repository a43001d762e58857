//! Acquisition & deduplication pipeline (spec §4.2): pluggable source
//! adapters, rate limiting, retry, three-level deduplication, multi-format
//! export, and the job orchestration that ties them together.

pub mod adapter;
pub mod dedup;
pub mod export;
pub mod pipeline;
pub mod rate_limit;
pub mod registry;
pub mod retry;

pub use adapter::{BoxedAdapter, FixtureSourceAdapter, SearchStream, SourceAdapter, SourceError, YearRange};
pub use dedup::{deduplicate, DedupOutcome, Deduplicator, DEFAULT_FUZZY_THRESHOLD};
pub use export::{ArtifactWriter, ExportFormat};
pub use pipeline::{AcquisitionPipeline, SubmitRequest};
pub use rate_limit::AdapterRateLimiter;
pub use registry::JobRegistry;
pub use retry::with_retry;
