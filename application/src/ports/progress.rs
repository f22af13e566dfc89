//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use parley_domain::{ChatEntry, EndType, Persona, SessionOutput};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain text, nothing).
pub trait SessionProgressNotifier: Send + Sync {
    /// Called once before the first turn
    fn on_session_start(&self, scenario: &str, roster_len: usize, end_type: &EndType);

    /// Called after each turn; `entry` is `None` when the speaker declined
    fn on_turn(&self, speaker: &Persona, entry: Option<&ChatEntry>, transcript_len: usize);

    /// Called after a probe was answered by the whole roster
    fn on_survey(&self, _question_id: &str, _iteration: usize, _answers: usize) {}

    /// Called once the final survey pass is done
    fn on_session_complete(&self, output: &SessionOutput);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SessionProgressNotifier for NoProgress {
    fn on_session_start(&self, _scenario: &str, _roster_len: usize, _end_type: &EndType) {}
    fn on_turn(&self, _speaker: &Persona, _entry: Option<&ChatEntry>, _transcript_len: usize) {}
    fn on_session_complete(&self, _output: &SessionOutput) {}
}
