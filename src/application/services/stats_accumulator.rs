//! Usage accounting for successful resolutions.

use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{error, warn};

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Number of retries after the first failed increment.
const MAX_RETRIES: usize = 3;

/// Records one click per successful resolution.
///
/// The increment itself is a single storage-side update
/// ([`LinkRepository::increment_usage`]), so concurrent calls for the same code
/// never lose counts. Transient storage failures are retried with jittered
/// exponential backoff (10ms, 20ms, 40ms); a retried increment may be applied
/// twice, which is acceptable for at-least-once accounting.
#[derive(Clone)]
pub struct StatsAccumulator {
    repository: Arc<dyn LinkRepository>,
}

impl StatsAccumulator {
    pub fn new(repository: Arc<dyn LinkRepository>) -> Self {
        Self { repository }
    }

    /// Increments `clicks` and sets `last_used = when`.
    ///
    /// Returns `Ok(false)` if the link no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] once the retry budget is exhausted.
    pub async fn record(&self, code: &str, when: DateTime<Utc>) -> Result<bool, AppError> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(5)
            .max_delay(Duration::from_millis(100))
            .map(jitter)
            .take(MAX_RETRIES);

        let result = Retry::spawn(strategy, || async {
            self.repository
                .increment_usage(code, when)
                .await
                .inspect_err(|e| warn!(code, error = %e, "Usage increment failed"))
        })
        .await;

        match result {
            Ok(recorded) => {
                if recorded {
                    counter!("link_clicks_recorded_total").increment(1);
                }
                Ok(recorded)
            }
            Err(e) => {
                error!(code, error = %e, "Giving up on usage increment");
                counter!("link_clicks_failed_total").increment(1);
                Err(AppError::internal(
                    "Failed to record usage",
                    json!({ "code": code, "attempts": MAX_RETRIES + 1 }),
                ))
            }
        }
    }
}
