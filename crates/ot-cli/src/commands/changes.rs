use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use ot_api::OrthancClient;
use ot_config::{ChangesConfig, ToolConfig};
use ot_watch::{
    Action, CancellationToken, ChangeHandler, ChangeLog, ChangeWatch, Dispatcher, WatchConfig,
    WatchError, WatchGroup,
};

use crate::cli::root_commands::ChangesArgs;

/// Which runs `orthanctool changes` starts, after flags and config merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesPlan {
    /// Follow new changes, polling at this interval.
    pub tail: Option<Duration>,
    /// Replay everything up to the startup snapshot.
    pub backfill: bool,
    /// After the backfill, re-sweep the whole log at this interval.
    pub sweep: Option<Duration>,
    pub filter: Option<String>,
    pub action: Action,
    pub page_limit: u32,
}

impl ChangesPlan {
    /// Flags win over `[changes]` config values.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Configuration`] if every mode is disabled.
    pub fn resolve(
        args: &ChangesArgs,
        config: &ChangesConfig,
        page_limit: u32,
    ) -> Result<Self, WatchError> {
        let secs = |value: u64| (value > 0).then(|| Duration::from_secs(value));

        let tail = secs(args.poll.unwrap_or(config.poll_secs));
        let sweep = secs(args.sweep.unwrap_or(config.sweep_secs));
        let backfill = args.all.unwrap_or(config.all) || sweep.is_some();

        if tail.is_none() && !backfill {
            return Err(WatchError::Configuration(
                "nothing to watch: polling, --all and --sweep are all disabled".into(),
            ));
        }

        Ok(Self {
            tail,
            backfill,
            sweep,
            filter: args.filter.clone().or_else(|| Some(config.filter.clone())),
            action: Action::from_argv(&args.command),
            page_limit,
        })
    }

    /// Spawn the tail and backfill/resweep runs into `group`.
    ///
    /// `snapshot` is the log tail read once at startup: the backfill stops
    /// there and the tail starts there, so neither depends on how fast the
    /// other one moves.
    pub fn spawn<L, H>(
        &self,
        group: &mut WatchGroup,
        log: &Arc<L>,
        handler: &Arc<H>,
        snapshot: u64,
    ) where
        L: ChangeLog + 'static,
        H: ChangeHandler + 'static,
    {
        let limit = self.page_limit;

        if let Some(poll) = self.tail {
            let (log, handler) = (Arc::clone(log), Arc::clone(handler));
            group.spawn(move |token| async move {
                let config = WatchConfig::tail(snapshot, poll).with_page_limit(limit);
                ChangeWatch::new("tail", config)
                    .run(&log, &token, &handler)
                    .await
            });
        }

        if self.backfill {
            let (log, handler) = (Arc::clone(log), Arc::clone(handler));
            let sweep = self.sweep;
            group.spawn(move |token| async move {
                let config = WatchConfig::backfill(snapshot).with_page_limit(limit);
                ChangeWatch::new("backfill", config)
                    .run(&log, &token, &handler)
                    .await?;

                let Some(interval) = sweep else {
                    return Ok(());
                };
                let resweep =
                    ChangeWatch::new("resweep", WatchConfig::resweep().with_page_limit(limit));
                loop {
                    tokio::select! {
                        () = token.cancelled() => return Err(WatchError::Cancelled),
                        () = tokio::time::sleep(interval) => {}
                    }
                    resweep.run(&log, &token, &handler).await?;
                }
            });
        }
    }
}

/// Handle `orthanctool changes`.
pub async fn handle(
    args: &ChangesArgs,
    client: &OrthancClient,
    config: &ToolConfig,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    let plan = ChangesPlan::resolve(args, &config.changes, config.orthanc.page_limit)?;
    tracing::debug!(?plan, "starting change watch");

    let handler = Arc::new(Dispatcher::new(plan.filter.clone(), plan.action.clone()));
    run(&plan, Arc::new(client.clone()), handler, shutdown).await
}

/// Snapshot the log, then run the plan until it finishes, fails, or
/// `shutdown` fires. An interrupted run is not an error.
pub async fn run<L, H>(
    plan: &ChangesPlan,
    log: Arc<L>,
    handler: Arc<H>,
    shutdown: &CancellationToken,
) -> anyhow::Result<()>
where
    L: ChangeLog + 'static,
    H: ChangeHandler + 'static,
{
    let snapshot = tokio::select! {
        () = shutdown.cancelled() => {
            tracing::info!("interrupted before the change log snapshot");
            return Ok(());
        }
        last = log.last_index() => {
            last.context("failed to read the current end of the change log")?.1
        }
    };
    tracing::info!(snapshot, "change log snapshot taken");

    let mut group = WatchGroup::new(shutdown);
    plan.spawn(&mut group, &log, &handler, snapshot);

    match group.wait().await {
        Err(error) if error.is_cancelled() && shutdown.is_cancelled() => {
            tracing::info!("change watch interrupted");
            Ok(())
        }
        result => result.map_err(anyhow::Error::from),
    }
}
