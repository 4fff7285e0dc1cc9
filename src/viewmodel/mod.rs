//! View-state holders sitting between the screens and the repository.
//!
//! Holders mutate their state only on the task that owns them. Every
//! repository call goes through [`on_background`] so the blocking SQLite work
//! never runs on the UI task.
pub mod statement;
pub mod transaction_form;

use crate::error::Error;

/// Runs a blocking repository call on the background pool and waits for it.
pub async fn on_background<T, F>(call: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call)
        .await
        .map_err(|e| Error::Background(e.to_string()))?
}
