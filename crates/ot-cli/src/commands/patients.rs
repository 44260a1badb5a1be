use anyhow::Context;
use ot_api::OrthancClient;
use ot_watch::CancellationToken;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{PatientArgs, PatientsArgs};
use crate::output::{output, output_line};

/// Handle `orthanctool patients`: page through every patient.
pub async fn handle_list(
    args: &PatientsArgs,
    client: &OrthancClient,
    shutdown: &CancellationToken,
) -> anyhow::Result<()> {
    anyhow::ensure!(args.limit > 0, "--limit must be at least 1");

    let mut since = args.since;
    loop {
        let page = tokio::select! {
            () = shutdown.cancelled() => return Ok(()),
            page = client.patient_details_since(since, args.limit) => {
                page.with_context(|| format!("failed to list patients from offset {since}"))?
            }
        };
        for patient in &page {
            output_line(patient)?;
        }
        tracing::debug!(since, count = page.len(), "listed patients");
        if page.len() < args.limit as usize {
            return Ok(());
        }
        since += page.len() as u64;
    }
}

/// Handle `orthanctool patient <id>`.
pub async fn handle_get(
    args: &PatientArgs,
    client: &OrthancClient,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let patient = client
        .patient(&args.id)
        .await
        .with_context(|| format!("failed to fetch patient {}", args.id))?;
    output(&patient, flags.format)
}
