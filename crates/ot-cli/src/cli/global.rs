use clap::ValueEnum;

/// Output mode for single-document commands.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Compact single-line JSON.
    Raw,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub orthanc: Option<String>,
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: bool,
}
