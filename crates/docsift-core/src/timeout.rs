use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Awaits `fut` for at most `millis` milliseconds.
pub async fn with_timeout<T, F>(operation: &str, millis: u64, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(Duration::from_millis(millis), fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout { operation: operation.to_string(), millis }),
    }
}
