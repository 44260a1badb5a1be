//! Running several watches at once with first-error-wins semantics.

use std::future::Future;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::error::WatchError;

/// A set of concurrently running watches sharing one cancellation token.
///
/// The first run to fail cancels the token, every other run unwinds, and
/// [`wait`](Self::wait) returns that first error once all runs have
/// returned. Errors arriving after the first are logged and dropped.
pub struct WatchGroup {
    token: CancellationToken,
    tasks: JoinSet<Result<(), WatchError>>,
}

impl WatchGroup {
    /// Create a group whose token is a child of `parent`. Cancelling the
    /// parent cancels the group; a failure inside the group does not cancel
    /// the parent.
    #[must_use]
    pub fn new(parent: &CancellationToken) -> Self {
        Self {
            token: parent.child_token(),
            tasks: JoinSet::new(),
        }
    }

    /// The group's token, for work that should stop with the group.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Start a run. `run` receives the group's token.
    pub fn spawn<F, Fut>(&mut self, run: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<(), WatchError>> + Send + 'static,
    {
        self.tasks.spawn(run(self.token.clone()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for every run to return and reduce their results to one.
    ///
    /// # Errors
    ///
    /// Returns the first error any run produced. A run that panicked is
    /// reported as [`WatchError::Task`].
    pub async fn wait(mut self) -> Result<(), WatchError> {
        let mut first: Option<WatchError> = None;

        while let Some(joined) = self.tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(WatchError::Task(e.to_string())));
            let Err(error) = result else {
                continue;
            };

            if first.is_some() {
                tracing::debug!(%error, "discarding error from sibling watch");
                continue;
            }
            if !error.is_cancelled() {
                tracing::debug!(
                    %error,
                    remaining = self.tasks.len(),
                    "watch failed, cancelling siblings"
                );
            }
            self.token.cancel();
            first = Some(error);
        }

        first.map_or(Ok(()), Err)
    }
}

/// Run every closure in `runs` concurrently under a child of `parent` and
/// return the first error, after all of them have returned.
///
/// # Errors
///
/// Returns the first error produced by any run.
pub async fn run_all<I, F, Fut>(parent: &CancellationToken, runs: I) -> Result<(), WatchError>
where
    I: IntoIterator<Item = F>,
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = Result<(), WatchError>> + Send + 'static,
{
    let mut group = WatchGroup::new(parent);
    for run in runs {
        group.spawn(run);
    }
    group.wait().await
}
