//! Survey domain
//!
//! Probes are questions asked to every participant alongside the
//! conversation. Their answers are recorded as [`SurveyQuestion`]s and never
//! enter the transcript.

pub mod policy;
pub mod probe;
pub mod question;

pub use policy::{DEFAULT_SURVEY_PERIOD, SurveyPolicy};
pub use probe::{END_OF_SESSION, ProbeTrigger, SurveyProbe};
pub use question::SurveyQuestion;
