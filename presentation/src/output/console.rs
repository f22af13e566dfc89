//! Console output for sessions and batches

use colored::Colorize;
use parley_application::BatchReport;
use parley_domain::{ChatEntry, SessionOutput, SessionSnapshot, SurveyQuestion};

/// Formats session results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Text transcript followed by the survey answers
    pub fn format_output(output: &SessionOutput) -> String {
        let mut text = String::new();

        text.push_str(&Self::section_header("Conversation"));
        text.push_str(&Self::format_transcript(&output.chat_entry));

        if !output.survey_question.is_empty() {
            text.push_str(&Self::section_header("Survey"));
            text.push_str(&Self::format_surveys(&output.survey_question));
        }

        text.push_str(&Self::footer());
        text
    }

    /// Format a saved session for `inspect`
    pub fn format_snapshot(snapshot: &SessionSnapshot) -> String {
        let mut text = String::new();

        text.push_str(&Self::header("Saved Session"));
        text.push('\n');
        text.push_str(&format!(
            "{} {}\n",
            "Scenario:".cyan().bold(),
            snapshot.scenario
        ));
        let persons: Vec<String> = snapshot
            .persons
            .iter()
            .map(|p| format!("{} ({})", p.name, snapshot.entries_by(&p.name).count()))
            .collect();
        text.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            persons.join(", ")
        ));
        text.push_str(&format!(
            "{} {}\n",
            "Host:".cyan().bold(),
            snapshot.host.kind().as_str()
        ));
        text.push_str(&format!(
            "{} {} (prompt {}, surveys {})\n",
            "Ends:".cyan().bold(),
            snapshot.end_type,
            if snapshot.prompt_version.is_empty() {
                "-"
            } else {
                snapshot.prompt_version.as_str()
            },
            snapshot.survey_policy
        ));
        let status = if snapshot.did_end() {
            "finished".green()
        } else {
            "unfinished".yellow()
        };
        text.push_str(&format!(
            "{} {} after {} messages\n",
            "Status:".cyan().bold(),
            status,
            snapshot.session_length()
        ));

        text.push_str(&Self::section_header("Transcript"));
        text.push_str(&Self::format_transcript(&snapshot.chat_room));
        text.push_str(&Self::footer());
        text
    }

    pub fn format_transcript(entries: &[ChatEntry]) -> String {
        if entries.is_empty() {
            return format!("  {}\n", "(no messages)".dimmed());
        }
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                format!(
                    "{:>4} {} {}\n",
                    format!("{}.", i + 1).dimmed(),
                    format!("{}:", entry.entity().name()).yellow().bold(),
                    entry.answer()
                )
            })
            .collect()
    }

    fn format_surveys(surveys: &[SurveyQuestion]) -> String {
        let mut text = String::new();
        let mut current: Option<(&str, usize)> = None;
        for survey in surveys {
            let key = (survey.question_id.as_str(), survey.iteration);
            if current != Some(key) {
                text.push_str(&format!(
                    "\n{} {}\n",
                    format!("[{} @ {}]", survey.question_id, survey.iteration)
                        .cyan()
                        .bold(),
                    survey.question_content
                ));
                current = Some(key);
            }
            text.push_str(&format!(
                "  {} {}\n",
                format!("{}:", survey.chat_entry.entity().name()).yellow(),
                survey.chat_entry.answer()
            ));
        }
        text
    }

    pub fn format_batch_report(report: &BatchReport) -> String {
        let mut text = String::new();
        text.push_str(&Self::header("Batch Summary"));
        text.push_str(&format!(
            "\n  {} completed, {} skipped, {} failed\n",
            report.completed.len().to_string().green().bold(),
            report.skipped.len().to_string().cyan(),
            if report.failed.is_empty() {
                "0".normal()
            } else {
                report.failed.len().to_string().red().bold()
            }
        ));
        for (job, reason) in &report.failed {
            text.push_str(&format!("  {} {}: {}\n", "x".red(), job, reason));
        }
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!(
            "\n{}\n{:^60}\n{}\n",
            line.cyan(),
            title.cyan().bold(),
            line.cyan()
        )
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.magenta().bold(), "-".repeat(40).magenta())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}
