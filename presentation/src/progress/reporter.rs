//! Progress reporting while a session runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parley_application::SessionProgressNotifier;
use parley_domain::{ChatEntry, EndType, Persona, SessionOutput, truncate};
use std::sync::Mutex;

const PREVIEW_CHARS: usize = 60;

/// Reports progress with a bar counting transcript messages
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProgressNotifier for ProgressReporter {
    fn on_session_start(&self, _scenario: &str, roster_len: usize, end_type: &EndType) {
        let EndType::Iteration { max_num_msgs } = *end_type;
        let pb = ProgressBar::new(max_num_msgs as u64);
        pb.set_style(Self::bar_style());
        pb.set_prefix(format!("{} participants", roster_len));
        pb.set_message("Starting...");
        if let Ok(mut guard) = self.bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_turn(&self, speaker: &Persona, entry: Option<&ChatEntry>, transcript_len: usize) {
        self.with_bar(|pb| {
            pb.set_position(transcript_len as u64);
            match entry {
                Some(entry) => pb.set_message(format!(
                    "{} {}",
                    format!("{}:", speaker.name).yellow(),
                    truncate(entry.answer(), PREVIEW_CHARS)
                )),
                None => pb.set_message(format!("{} declined", speaker.name).dimmed().to_string()),
            }
        });
    }

    fn on_survey(&self, question_id: &str, iteration: usize, answers: usize) {
        self.with_bar(|pb| {
            pb.println(format!(
                "  {} survey {} at {} messages ({} answers)",
                "?".cyan(),
                question_id.bold(),
                iteration,
                answers
            ));
        });
    }

    fn on_session_complete(&self, output: &SessionOutput) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!(
                "{} ({} survey answers)",
                "Session complete!".green(),
                output.survey_question.len()
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Used when a participant reads from the terminal, where a redrawn bar
/// would fight with the prompt. Writes to stderr so stdout stays clean for
/// session output.
pub struct SimpleProgress;

impl SessionProgressNotifier for SimpleProgress {
    fn on_session_start(&self, scenario: &str, roster_len: usize, end_type: &EndType) {
        eprintln!(
            "{} {} ({} participants, ends {})",
            "->".cyan(),
            truncate(scenario, PREVIEW_CHARS).bold(),
            roster_len,
            end_type
        );
    }

    fn on_turn(&self, speaker: &Persona, entry: Option<&ChatEntry>, transcript_len: usize) {
        match entry {
            Some(entry) => eprintln!(
                "  {:>3} {} {}",
                transcript_len,
                format!("{}:", speaker.name).yellow(),
                entry.answer()
            ),
            None => eprintln!("      {}", format!("{} declined", speaker.name).dimmed()),
        }
    }

    fn on_survey(&self, question_id: &str, iteration: usize, answers: usize) {
        eprintln!(
            "  {} survey {} at {} messages ({} answers)",
            "?".cyan(),
            question_id.bold(),
            iteration,
            answers
        );
    }

    fn on_session_complete(&self, output: &SessionOutput) {
        eprintln!(
            "{} {} messages, {} survey answers",
            "v".green(),
            output.chat_entry.len(),
            output.survey_question.len()
        );
    }
}
