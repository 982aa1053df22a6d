use std::process::ExitCode;

/// Exit status of a run.
///
/// - `Success` (0): every template was processed and every bundle saved
/// - `Failure` (1): the run completed, but some templates were skipped (`--keep-going`)
/// - `Error` (2): the run was aborted (no bundles, malformed template, config error, etc.)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every template was processed.
    Success,
    /// Some templates were skipped.
    Failure,
    /// The run was aborted.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
