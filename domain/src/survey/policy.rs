//! Survey firing policy

use super::probe::SurveyProbe;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Default period of [`SurveyPolicy::Periodic`]
pub const DEFAULT_SURVEY_PERIOD: usize = 4;

/// Decides which probes are due on a survey pass
///
/// `Periodic` fires every probe whenever the transcript length is a
/// multiple of `every`, regardless of the probe's declared trigger.
/// `Declared` honours each probe's own [`ProbeTrigger`](super::ProbeTrigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "lowercase")]
pub enum SurveyPolicy {
    Periodic { every: usize },
    Declared,
}

impl Default for SurveyPolicy {
    fn default() -> Self {
        SurveyPolicy::Periodic {
            every: DEFAULT_SURVEY_PERIOD,
        }
    }
}

impl SurveyPolicy {
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            SurveyPolicy::Periodic { every: 0 } => Err(DomainError::InvalidSurveyPolicy(
                "periodic survey period must be at least 1".to_string(),
            )),
            _ => Ok(()),
        }
    }

    pub fn is_due(&self, probe: &SurveyProbe, transcript_len: usize, ended: bool) -> bool {
        match self {
            SurveyPolicy::Periodic { every } => *every > 0 && transcript_len % every == 0,
            SurveyPolicy::Declared => probe.trigger.matches(transcript_len, ended),
        }
    }

    /// Probes due at this point, in configuration order
    pub fn due_probes<'a>(
        &self,
        probes: &'a [SurveyProbe],
        transcript_len: usize,
        ended: bool,
    ) -> Vec<&'a SurveyProbe> {
        probes
            .iter()
            .filter(|p| self.is_due(p, transcript_len, ended))
            .collect()
    }
}

impl std::fmt::Display for SurveyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurveyPolicy::Periodic { every } => write!(f, "every {} messages", every),
            SurveyPolicy::Declared => write!(f, "declared triggers"),
        }
    }
}
