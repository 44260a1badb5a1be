//! What happens to each change: print it, or pipe it to a command.

use std::future::Future;
use std::io::{self, Write};
use std::process::Stdio;
use std::sync::Arc;

use ot_api::ChangeEntry;
use tokio::io::AsyncWriteExt;
use tokio::process::{ChildStdin, Command};

use crate::error::ActionError;

/// Receives changes from a watch, one at a time, in log order.
///
/// Runs may overlap (a backfill and a tail can both deliver the same entry),
/// so handlers must tolerate duplicates.
pub trait ChangeHandler: Send + Sync {
    fn handle(&self, entry: &ChangeEntry) -> impl Future<Output = Result<(), ActionError>> + Send;
}

impl<H: ChangeHandler> ChangeHandler for Arc<H> {
    fn handle(&self, entry: &ChangeEntry) -> impl Future<Output = Result<(), ActionError>> + Send {
        (**self).handle(entry)
    }
}

/// Where a change goes once it passes the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// One JSON line on stdout.
    Print,
    /// Run `program args...` once per change with the JSON record on stdin.
    Exec { program: String, args: Vec<String> },
}

impl Action {
    /// `Exec` for a non-empty argv, `Print` otherwise.
    #[must_use]
    pub fn from_argv(argv: &[String]) -> Self {
        match argv.split_first() {
            Some((program, args)) => Self::Exec {
                program: program.clone(),
                args: args.to_vec(),
            },
            None => Self::Print,
        }
    }
}

/// Filters changes by type and applies an [`Action`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    filter: Option<String>,
    action: Action,
}

impl Dispatcher {
    /// An empty filter string matches every change type.
    #[must_use]
    pub fn new(filter: Option<String>, action: Action) -> Self {
        Self {
            filter: filter.filter(|f| !f.is_empty()),
            action,
        }
    }

    #[must_use]
    pub fn accepts(&self, entry: &ChangeEntry) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|wanted| wanted == entry.change_type)
    }

    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.action
    }
}

impl ChangeHandler for Dispatcher {
    async fn handle(&self, entry: &ChangeEntry) -> Result<(), ActionError> {
        if !self.accepts(entry) {
            return Ok(());
        }
        let record = serde_json::to_string(entry)?;
        match &self.action {
            Action::Print => print_line(&mut io::stdout().lock(), &record),
            Action::Exec { program, args } => exec(program, args, &record).await,
        }
    }
}

/// Write one record line. A closed stdout (`orthanctool changes | head`)
/// is an error, never a panic.
fn print_line(out: &mut impl Write, record: &str) -> Result<(), ActionError> {
    writeln!(out, "{record}")
        .and_then(|()| out.flush())
        .map_err(ActionError::Output)
}

async fn exec(program: &str, args: &[String], record: &str) -> Result<(), ActionError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| ActionError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let written = match child.stdin.take() {
        // stdin drops here, so the command sees EOF before we wait.
        Some(mut stdin) => write_record(&mut stdin, record).await,
        None => Ok(()),
    };

    let status = child.wait().await.map_err(|source| ActionError::Io {
        program: program.to_string(),
        source,
    })?;
    if !status.success() {
        return Err(ActionError::Failed {
            program: program.to_string(),
            status,
        });
    }

    match written {
        // The command exited cleanly without reading all of its input.
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!(program, "command closed stdin before reading the record");
        }
        Err(source) => {
            return Err(ActionError::Io {
                program: program.to_string(),
                source,
            });
        }
        Ok(()) => {}
    }
    tracing::trace!(program, "action completed");
    Ok(())
}

async fn write_record(stdin: &mut ChildStdin, record: &str) -> io::Result<()> {
    stdin.write_all(record.as_bytes()).await?;
    stdin.write_all(b"\n").await
}
