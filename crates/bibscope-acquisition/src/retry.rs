//! Exponential backoff for outbound source calls (spec §7 "Retries"),
//! generalizing the teacher's `RetryConfig`/`RetryDefaults` shape.

use std::future::Future;
use std::time::Duration;

use bibscope_common::config::RetryConfig;

/// Retry `op` up to `config.max_attempts` times with exponential backoff.
/// Returns the last error if every attempt fails. Per spec §7, only
/// per-source calls are retried; dedup and export are not.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, adapter_id: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0u32;
    let mut backoff_ms = config.initial_backoff_ms;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= config.max_attempts {
                    return Err(err);
                }
                tracing::warn!(adapter = adapter_id, attempt, "source call failed, retrying");
                metrics::counter!("acquisition.source.retry", "adapter" => adapter_id.to_string()).increment(1);
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = ((backoff_ms as f64) * config.backoff_multiplier) as u64;
                backoff_ms = backoff_ms.min(config.max_backoff_ms);
            }
        }
    }
}
