//! Progress and status reporting seam between the pipeline and its host

/// Receives coarse progress and human-readable status lines from an export.
///
/// Progress is observational only; the pipeline reports 50 once the
/// duplicate subset is computed and 100 once the output is written.
pub trait ProgressSink {
    fn progress(&self, percent: u8);
    fn status(&self, message: &str);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl ProgressSink for SilentSink {
    fn progress(&self, _percent: u8) {}
    fn status(&self, _message: &str) {}
}
