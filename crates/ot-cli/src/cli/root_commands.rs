use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Stream change log entries as JSON, or run a command for each.
    ///
    /// Without a command every change is printed as one JSON line. With a
    /// command, it is run once per change and the JSON is passed on stdin.
    Changes(ChangesArgs),
    /// List patients, one JSON line each.
    Patients(PatientsArgs),
    /// Show one patient.
    Patient(PatientArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ChangesArgs {
    /// Replay changes that existed at startup [config default: true]
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    pub all: Option<bool>,

    /// Only handle changes of this type (e.g. `StableStudy`)
    #[arg(long)]
    pub filter: Option<String>,

    /// Poll interval in seconds; 0 disables following new changes [config default: 60]
    #[arg(long, value_name = "SECONDS")]
    pub poll: Option<u64>,

    /// Re-sweep the whole log every N seconds; 0 disables. Implies --all
    #[arg(long, value_name = "SECONDS")]
    pub sweep: Option<u64>,

    /// Command to run for each change
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct PatientsArgs {
    /// Skip this many patients
    #[arg(long, default_value_t = 0)]
    pub since: u64,

    /// Patients requested per page
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

#[derive(Clone, Debug, Args)]
pub struct PatientArgs {
    /// Orthanc patient identifier
    pub id: String,
}
