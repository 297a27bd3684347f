use app_api::AppContext;
use tracing::warn;
use usage_core::Deadline;

use crate::errors::HttpError;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
}

impl HttpState {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    /// Runs blocking store work on the blocking pool under a fresh per-request
    /// deadline.
    ///
    /// The deadline is cancelled when this future is dropped, so a client that
    /// disconnects stops its in-flight query.
    pub async fn run<T, F>(&self, work: F) -> Result<T, HttpError>
    where
        F: FnOnce(&AppContext, &Deadline) -> usage_app::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let deadline = self.context.app_state.request_deadline();
        let _cancel = deadline.cancel_on_drop();
        let context = self.context.clone();
        let worker_deadline = deadline.clone();
        let task = tokio::task::spawn_blocking(move || work(&context, &worker_deadline));

        let joined = match self.context.app_state.config.request_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    deadline.cancel();
                    warn!(timeout_ms = limit.as_millis() as u64, "request timed out");
                    return Err(HttpError::timeout());
                }
            },
            None => task.await,
        };
        let result = joined.map_err(|err| HttpError::internal(format!("worker failed: {err}")))?;
        Ok(result?)
    }
}
