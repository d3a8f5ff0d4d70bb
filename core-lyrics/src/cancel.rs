use crate::error::{LyricsError, Result};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Run `future` unless `cancel` fires first.
pub(crate) async fn race<F, T>(cancel: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LyricsError::Cancelled),
        output = future => output,
    }
}

/// Sleep for `delay` unless `cancel` fires first.
pub(crate) async fn sleep(cancel: &CancellationToken, delay: Duration) -> Result<()> {
    race(cancel, async {
        tokio::time::sleep(delay).await;
        Ok(())
    })
    .await
}

/// Turn a collaborator failure into "no data", keeping cancellation fatal.
pub(crate) fn recover<T: Default>(result: Result<T>, operation: &str) -> Result<T> {
    match result {
        Err(LyricsError::Cancelled) => Err(LyricsError::Cancelled),
        Err(e) => {
            warn!(operation, error = %e, "Metadata provider call failed, continuing without it");
            Ok(T::default())
        }
        ok => ok,
    }
}
