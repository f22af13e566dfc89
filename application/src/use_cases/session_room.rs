//! Session room: the conversation control loop.
//!
//! A [`SessionRoom`] owns the transcript of one session and drives it:
//!
//! ```text
//! loop while the end type has not fired:
//!     survey pass   (due probes, answered on a copy of the transcript)
//!     one turn      (host picks a speaker, its answer is appended if any)
//! final survey pass
//! ```
//!
//! Survey answers go into the [`SessionOutput`] only; the transcript never
//! sees them.

use crate::config::{ConfigError, PersonSpec, RunParams, SessionConfig};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::participant::{Participant, ParticipantError};
use crate::ports::progress::{NoProgress, SessionProgressNotifier};
use crate::ports::session_store::StoreError;
use crate::registry::ParticipantRegistry;
use parley_domain::{
    ChatEntry, DomainError, EndPolicy, EndType, Host, PersonSettings, Persona, SessionOutput,
    SessionSnapshot, SurveyPolicy, SurveyProbe, SurveyQuestion, TurnScheduler, truncate,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a session
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Participant {name} failed: {source}")]
    Participant {
        name: String,
        #[source]
        source: ParticipantError,
    },

    #[error("Participant {name} broke the answer contract: {reason}")]
    ContractViolation { name: String, reason: String },

    #[error("Host picked speaker {index} from a roster of {roster_len}")]
    SpeakerOutOfRange { index: usize, roster_len: usize },

    #[error("Turn limit of {max_turns} reached with {messages} messages in the transcript")]
    TurnLimitReached { max_turns: usize, messages: usize },

    #[error("Failed to persist session: {source}")]
    Persistence {
        #[source]
        source: StoreError,
        /// The run itself completed; its output is still available
        output: Box<SessionOutput>,
    },
}

impl From<DomainError> for RunSessionError {
    fn from(e: DomainError) -> Self {
        RunSessionError::Configuration(ConfigError::Domain(e))
    }
}

/// One simulated conversation
pub struct SessionRoom {
    scenario: String,
    survey_questions: Vec<SurveyProbe>,
    survey_policy: SurveyPolicy,
    persons: Vec<Arc<dyn Participant>>,
    person_settings: Vec<PersonSettings>,
    host: Host,
    end_type: EndType,
    chat_room: Vec<ChatEntry>,
    prompt_version: String,
    max_turns: Option<usize>,
    progress: Arc<dyn SessionProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl SessionRoom {
    /// Assemble a room from already-built parts
    ///
    /// The host must be bound to a roster of exactly `persons.len()`.
    pub fn new(
        scenario: impl Into<String>,
        survey_questions: Vec<SurveyProbe>,
        persons: Vec<Arc<dyn Participant>>,
        host: Host,
        end_type: EndType,
    ) -> Result<Self, ConfigError> {
        if persons.is_empty() {
            return Err(DomainError::EmptyRoster.into());
        }
        if host.roster_len() != persons.len() {
            return Err(ConfigError::RosterMismatch {
                host: host.roster_len(),
                roster: persons.len(),
            });
        }
        for probe in &survey_questions {
            probe.validate()?;
        }
        Ok(Self {
            scenario: scenario.into(),
            survey_questions,
            survey_policy: SurveyPolicy::default(),
            person_settings: vec![PersonSettings::new(); persons.len()],
            persons,
            host,
            end_type,
            chat_room: Vec::new(),
            prompt_version: String::new(),
            max_turns: None,
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
        })
    }

    /// Build a room from a session file, resolving participants via `registry`
    pub fn from_config(
        config: &SessionConfig,
        registry: &ParticipantRegistry,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let persons = registry.build_roster(&config.persons)?;
        let mut room = Self::new(
            config.experiment.scenario.clone(),
            config.experiment.survey_questions.clone(),
            persons,
            config.host()?,
            config.end_type()?,
        )?;
        room.person_settings = config.persons.iter().map(|p| p.extra.clone()).collect();
        Ok(room)
    }

    /// Rebuild a live room from a persisted snapshot
    ///
    /// Participants are recreated from their personas and saved settings;
    /// the transcript and the host cursor continue where the snapshot left
    /// off.
    pub fn restore(
        snapshot: SessionSnapshot,
        registry: &ParticipantRegistry,
    ) -> Result<Self, ConfigError> {
        let specs: Vec<PersonSpec> = snapshot
            .persons
            .iter()
            .enumerate()
            .map(|(i, p)| PersonSpec::from_persona(p, snapshot.settings_of(i)))
            .collect();
        let persons = registry.build_roster(&specs)?;
        let mut room = Self::new(
            snapshot.scenario,
            snapshot.survey_questions,
            persons,
            snapshot.host,
            snapshot.end_type,
        )?
        .with_survey_policy(snapshot.survey_policy)?;
        room.person_settings = specs.into_iter().map(|spec| spec.extra).collect();
        room.chat_room = snapshot.chat_room;
        room.prompt_version = snapshot.prompt_version;
        Ok(room)
    }

    pub fn with_survey_policy(mut self, policy: SurveyPolicy) -> Result<Self, ConfigError> {
        policy.validate()?;
        self.survey_policy = policy;
        Ok(self)
    }

    pub fn with_max_turns(mut self, max_turns: Option<usize>) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Apply survey policy and turn guard from `params`
    pub fn with_params(self, params: &RunParams) -> Result<Self, ConfigError> {
        Ok(self
            .with_survey_policy(params.survey_policy)?
            .with_max_turns(params.max_turns))
    }

    pub fn with_progress(mut self, progress: Arc<dyn SessionProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    // ==================== Accessors ====================

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// The authoritative transcript
    pub fn chat_room(&self) -> &[ChatEntry] {
        &self.chat_room
    }

    pub fn session_length(&self) -> usize {
        self.chat_room.len()
    }

    pub fn persons(&self) -> &[Arc<dyn Participant>] {
        &self.persons
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn end_type(&self) -> &EndType {
        &self.end_type
    }

    pub fn prompt_version(&self) -> &str {
        &self.prompt_version
    }

    pub fn did_end(&self) -> bool {
        self.end_type.did_end(&self.chat_room)
    }

    /// Serializable image of the current state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            scenario: self.scenario.clone(),
            survey_questions: self.survey_questions.clone(),
            survey_policy: self.survey_policy,
            persons: self
                .persons
                .iter()
                .map(|p| Arc::clone(p.persona()))
                .collect(),
            person_settings: self
                .persons
                .iter()
                .zip(&self.person_settings)
                .map(|(person, configured)| {
                    let mut settings = configured.clone();
                    if let Some(update) = person.settings_update() {
                        settings.extend(update);
                    }
                    settings
                })
                .collect(),
            host: self.host.clone(),
            end_type: self.end_type,
            chat_room: self.chat_room.clone(),
            prompt_version: self.prompt_version.clone(),
        }
    }

    // ==================== Control loop ====================

    /// Run the session until the end type fires
    pub async fn run(&mut self, prompt_version: &str) -> Result<SessionOutput, RunSessionError> {
        info!(
            "Session room is running: {} participants, ends {}, surveys {}",
            self.persons.len(),
            self.end_type,
            self.survey_policy
        );
        self.prompt_version = prompt_version.to_string();
        self.progress
            .on_session_start(&self.scenario, self.persons.len(), &self.end_type);
        self.conversation_logger.log(ConversationEvent::new(
            "session_start",
            json!({
                "scenario": self.scenario,
                "persons": self.persons.iter().map(|p| p.name()).collect::<Vec<_>>(),
                "prompt_version": self.prompt_version,
                "resumed_at": self.chat_room.len(),
            }),
        ));

        let mut output = SessionOutput::new();
        let mut turns = 0usize;

        while !self.did_end() {
            self.ask_survey_questions_if_needed(&mut output, false)
                .await?;

            if let Some(max_turns) = self.max_turns
                && turns >= max_turns
            {
                warn!(
                    "Stopping after {} turns: transcript still at {} messages",
                    turns,
                    self.chat_room.len()
                );
                return Err(RunSessionError::TurnLimitReached {
                    max_turns,
                    messages: self.chat_room.len(),
                });
            }

            turns += 1;
            if let Some(entry) = self.iterate().await? {
                output.record_entry(entry);
            }
        }

        self.ask_survey_questions_if_needed(&mut output, true).await?;

        info!(
            "Session finished after {} turns: {} messages, {} survey answers",
            turns,
            output.chat_entry.len(),
            output.survey_question.len()
        );
        self.progress.on_session_complete(&output);
        self.conversation_logger.log(ConversationEvent::new(
            "session_end",
            json!({
                "turns": turns,
                "messages": self.chat_room.len(),
                "survey_answers": output.survey_question.len(),
            }),
        ));
        Ok(output)
    }

    /// Take one turn; returns the appended entry, if any
    pub async fn iterate(&mut self) -> Result<Option<ChatEntry>, RunSessionError> {
        let index = self.host.next_speaker();
        let person = self
            .persons
            .get(index)
            .cloned()
            .ok_or(RunSessionError::SpeakerOutOfRange {
                index,
                roster_len: self.persons.len(),
            })?;

        let answer = person
            .generate_answer(&self.scenario, &self.chat_room, &self.prompt_version, false)
            .await
            .map_err(|source| RunSessionError::Participant {
                name: person.name().to_string(),
                source,
            })?;

        let Some(entry) = answer else {
            debug!("{} declined to answer", person.name());
            self.progress
                .on_turn(person.persona(), None, self.chat_room.len());
            self.conversation_logger.log(ConversationEvent::new(
                "turn_declined",
                json!({ "speaker": person.name(), "messages": self.chat_room.len() }),
            ));
            return Ok(None);
        };

        Self::check_speaker(person.persona(), &entry)?;
        self.chat_room.push(entry.clone());
        info!("{}", truncate(&entry.to_string(), 200));
        self.progress
            .on_turn(person.persona(), Some(&entry), self.chat_room.len());
        self.conversation_logger.log(ConversationEvent::new(
            "turn",
            json!({
                "speaker": person.name(),
                "index": self.chat_room.len() - 1,
                "answer": entry.answer(),
            }),
        ));
        Ok(Some(entry))
    }

    /// Ask every due probe to the whole roster
    ///
    /// Each probe is answered on its own copy of the transcript with the
    /// probe appended as a system entry. Returns the number of answers
    /// recorded.
    pub async fn ask_survey_questions_if_needed(
        &self,
        output: &mut SessionOutput,
        ended: bool,
    ) -> Result<usize, RunSessionError> {
        let iteration = self.chat_room.len();
        let due = self
            .survey_policy
            .due_probes(&self.survey_questions, iteration, ended);
        if due.is_empty() {
            return Ok(0);
        }

        info!(
            "Starting survey at message {}: {} question(s) for everyone",
            iteration,
            due.len()
        );
        let mut recorded = 0;
        for probe in due {
            let mut with_probe = self.chat_room.clone();
            with_probe.push(ChatEntry::system(&probe.question));

            let mut answers = 0;
            for person in &self.persons {
                let answer = person
                    .generate_answer(&self.scenario, &with_probe, &self.prompt_version, true)
                    .await
                    .map_err(|source| RunSessionError::Participant {
                        name: person.name().to_string(),
                        source,
                    })?;
                let Some(entry) = answer else {
                    debug!("{} skipped survey question {}", person.name(), probe.id);
                    continue;
                };
                Self::check_speaker(person.persona(), &entry)?;

                self.conversation_logger.log(ConversationEvent::new(
                    "survey_answer",
                    json!({
                        "question_id": probe.id,
                        "iteration": iteration,
                        "speaker": person.name(),
                        "answer": entry.answer(),
                    }),
                ));
                output.record_survey(SurveyQuestion::new(
                    &probe.id,
                    &probe.question,
                    iteration,
                    entry,
                ));
                answers += 1;
            }
            self.progress.on_survey(&probe.id, iteration, answers);
            recorded += answers;
        }
        Ok(recorded)
    }

    /// An entry must carry the very persona of the participant that produced
    /// it; an equal copy does not count.
    fn check_speaker(persona: &Arc<Persona>, entry: &ChatEntry) -> Result<(), RunSessionError> {
        match entry.entity().persona() {
            Some(p) if Arc::ptr_eq(p, persona) => Ok(()),
            Some(p) if p.as_ref() == persona.as_ref() => Err(RunSessionError::ContractViolation {
                name: persona.name.clone(),
                reason: "answer signed with a copy of the persona".to_string(),
            }),
            Some(p) => Err(RunSessionError::ContractViolation {
                name: persona.name.clone(),
                reason: format!("answer attributed to {}", p.name),
            }),
            None => Err(RunSessionError::ContractViolation {
                name: persona.name.clone(),
                reason: "answer attributed to the system".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for SessionRoom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRoom")
            .field("scenario", &self.scenario)
            .field(
                "persons",
                &self.persons.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("host", &self.host)
            .field("end_type", &self.end_type)
            .field("chat_room", &self.chat_room.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parley_domain::{HostKind, ProbeTrigger, Speaker};
    use serde_json::json;
    use std::sync::Mutex;

    /// What a scripted participant does on each call
    #[derive(Clone)]
    enum Behavior {
        Answer,
        Decline,
        Fail,
        Impersonate(Arc<Persona>),
    }

    /// Participant that records every transcript it was shown
    struct ScriptedParticipant {
        persona: Arc<Persona>,
        chat: Behavior,
        survey: Behavior,
        seen: Mutex<Vec<(usize, bool)>>,
        calls: Mutex<usize>,
    }

    impl ScriptedParticipant {
        fn new(name: &str, chat: Behavior, survey: Behavior) -> Arc<Self> {
            Arc::new(Self {
                persona: Arc::new(Persona::new("scripted", name, "")),
                chat,
                survey,
                seen: Mutex::new(Vec::new()),
                calls: Mutex::new(0),
            })
        }

        fn answering(name: &str) -> Arc<Self> {
            Self::new(name, Behavior::Answer, Behavior::Answer)
        }
    }

    #[async_trait]
    impl Participant for ScriptedParticipant {
        fn persona(&self) -> &Arc<Persona> {
            &self.persona
        }

        async fn generate_answer(
            &self,
            _scenario: &str,
            transcript: &[ChatEntry],
            _prompt_version: &str,
            is_questionnaire: bool,
        ) -> Result<Option<ChatEntry>, ParticipantError> {
            self.seen
                .lock()
                .unwrap()
                .push((transcript.len(), is_questionnaire));
            let n = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            let behavior = if is_questionnaire {
                &self.survey
            } else {
                &self.chat
            };
            match behavior {
                Behavior::Answer => Ok(Some(ChatEntry::new(
                    Speaker::person(Arc::clone(&self.persona)),
                    vec![],
                    format!("{} #{}", self.persona.name, n),
                ))),
                Behavior::Decline => {
                    tokio::task::yield_now().await;
                    Ok(None)
                }
                Behavior::Fail => Err(ParticipantError::GenerationFailed("boom".to_string())),
                Behavior::Impersonate(other) => Ok(Some(ChatEntry::new(
                    Speaker::person(Arc::clone(other)),
                    vec![],
                    "not me",
                ))),
            }
        }
    }

    fn room(
        persons: Vec<Arc<ScriptedParticipant>>,
        probes: Vec<SurveyProbe>,
        max_num_msgs: usize,
    ) -> SessionRoom {
        let len = persons.len();
        let persons: Vec<Arc<dyn Participant>> = persons
            .into_iter()
            .map(|p| p as Arc<dyn Participant>)
            .collect();
        SessionRoom::new(
            "Tempolimit",
            probes,
            persons,
            Host::new(HostKind::RoundRobin, len, 0).unwrap(),
            EndType::iteration(max_num_msgs),
        )
        .unwrap()
    }

    fn probe(id: &str) -> SurveyProbe {
        SurveyProbe::new(id, ProbeTrigger::Always, "Von 0 bis 10?")
    }

    #[tokio::test]
    async fn test_minimal_run() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![anna, ben], vec![], 2);

        let output = room.run("v0").await.unwrap();

        assert_eq!(output.chat_entry.len(), 2);
        assert_eq!(output.chat_entry[0].entity().name(), "Anna");
        assert_eq!(output.chat_entry[1].entity().name(), "Ben");
        assert!(output.survey_question.is_empty());
        assert_eq!(room.chat_room(), output.chat_entry.as_slice());
        assert_eq!(room.prompt_version(), "v0");
    }

    #[tokio::test]
    async fn test_probes_fire_at_zero_and_four() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![anna, ben], vec![probe("intro")], 6);

        let output = room.run("v0").await.unwrap();

        assert_eq!(output.chat_entry.len(), 6);
        let iterations: Vec<usize> = output.survey_question.iter().map(|q| q.iteration).collect();
        assert_eq!(iterations, vec![0, 0, 4, 4]);
        assert_eq!(output.survey_question[0].chat_entry.entity().name(), "Anna");
        assert_eq!(output.survey_question[1].chat_entry.entity().name(), "Ben");
        assert_eq!(output.survey_question[0].question_id, "intro");
    }

    #[tokio::test]
    async fn test_final_survey_pass_runs_after_end() {
        let anna = ScriptedParticipant::answering("Anna");
        let mut room = room(vec![anna], vec![probe("intro")], 4);

        let output = room.run("v0").await.unwrap();

        // Fired at 0 during the loop and at 4 in the final pass, once each
        let iterations: Vec<usize> = output.survey_question.iter().map(|q| q.iteration).collect();
        assert_eq!(iterations, vec![0, 4]);
    }

    #[tokio::test]
    async fn test_survey_does_not_touch_transcript() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let room = room(vec![Arc::clone(&anna), ben], vec![probe("a"), probe("b")], 4);

        let before = room.chat_room().to_vec();
        let mut output = SessionOutput::new();
        let recorded = room
            .ask_survey_questions_if_needed(&mut output, false)
            .await
            .unwrap();

        assert_eq!(recorded, 4);
        assert_eq!(room.chat_room(), before.as_slice());
        assert!(output.chat_entry.is_empty());
        // Each probe was answered on the transcript plus one probe entry
        assert!(anna.seen.lock().unwrap().iter().all(|&(len, q)| len == 1 && q));
    }

    #[tokio::test]
    async fn test_survey_entries_are_not_seen_by_later_turns() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![Arc::clone(&anna), ben], vec![probe("intro")], 2);

        room.run("v0").await.unwrap();

        let chat_lengths: Vec<usize> = anna
            .seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, q)| !q)
            .map(|(len, _)| *len)
            .collect();
        assert_eq!(chat_lengths, vec![0]);
        assert!(room.chat_room().iter().all(|e| !e.entity().is_system()));
    }

    #[tokio::test]
    async fn test_transcript_grows_as_prefix() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![anna, ben], vec![], 5);

        let mut previous: Vec<ChatEntry> = Vec::new();
        while !room.did_end() {
            room.iterate().await.unwrap();
            assert!(room.chat_room().starts_with(&previous));
            previous = room.chat_room().to_vec();
        }
        assert_eq!(previous.len(), 5);
    }

    #[tokio::test]
    async fn test_declined_survey_answers_are_skipped() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::new("Ben", Behavior::Answer, Behavior::Decline);
        let mut room = room(vec![anna, ben], vec![probe("intro")], 1);

        let output = room.run("v0").await.unwrap();

        assert_eq!(output.survey_question.len(), 1);
        assert_eq!(output.survey_question[0].chat_entry.entity().name(), "Anna");
    }

    #[tokio::test]
    async fn test_declining_participant_livelocks_without_guard() {
        let anna = ScriptedParticipant::new("Anna", Behavior::Decline, Behavior::Decline);
        let ben = ScriptedParticipant::new("Ben", Behavior::Decline, Behavior::Decline);
        let mut room = room(vec![anna, ben], vec![], 2);

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(200), room.run("v0")).await;

        assert!(result.is_err(), "session should still be running");
    }

    #[tokio::test]
    async fn test_turn_guard_stops_declining_session() {
        let anna = ScriptedParticipant::new("Anna", Behavior::Decline, Behavior::Decline);
        let ben = ScriptedParticipant::new("Ben", Behavior::Decline, Behavior::Decline);
        let mut room = room(vec![anna, ben], vec![], 2).with_max_turns(Some(10));

        let err = room.run("v0").await.unwrap_err();

        assert!(matches!(
            err,
            RunSessionError::TurnLimitReached {
                max_turns: 10,
                messages: 0
            }
        ));
        assert_eq!(room.session_length(), 0);
    }

    #[tokio::test]
    async fn test_one_declining_participant_still_ends() {
        let anna = ScriptedParticipant::new("Anna", Behavior::Decline, Behavior::Decline);
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![Arc::clone(&anna), ben], vec![], 2).with_max_turns(Some(10));

        let output = room.run("v0").await.unwrap();

        assert_eq!(output.chat_entry.len(), 2);
        assert!(output.chat_entry.iter().all(|e| e.is_from("Ben")));
        assert_eq!(*anna.calls.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_declined_turn_does_not_append() {
        let anna = ScriptedParticipant::new("Anna", Behavior::Decline, Behavior::Answer);
        let ben = ScriptedParticipant::answering("Ben");
        let mut room = room(vec![anna, ben], vec![], 3);

        assert!(room.iterate().await.unwrap().is_none());
        assert_eq!(room.session_length(), 0);
        assert!(room.iterate().await.unwrap().is_some());
        assert_eq!(room.session_length(), 1);
    }

    #[tokio::test]
    async fn test_participant_failure_aborts() {
        let anna = ScriptedParticipant::new("Anna", Behavior::Fail, Behavior::Answer);
        let mut room = room(vec![anna], vec![], 2);

        let err = room.run("v0").await.unwrap_err();

        assert!(matches!(err, RunSessionError::Participant { ref name, .. } if name == "Anna"));
        assert_eq!(room.session_length(), 0);
    }

    #[tokio::test]
    async fn test_impersonation_is_contract_violation() {
        let ghost = Arc::new(Persona::new("scripted", "Ghost", ""));
        let anna = ScriptedParticipant::new("Anna", Behavior::Impersonate(ghost), Behavior::Answer);
        let mut room = room(vec![anna], vec![], 1);

        let err = room.run("v0").await.unwrap_err();

        assert!(matches!(err, RunSessionError::ContractViolation { .. }));
        assert_eq!(room.session_length(), 0);
    }

    #[tokio::test]
    async fn test_declared_policy_fires_end_probe_once() {
        let anna = ScriptedParticipant::answering("Anna");
        let probes = vec![
            SurveyProbe::new("start", ProbeTrigger::at([0]), "Q1"),
            SurveyProbe::new("end", ProbeTrigger::at_end(), "Q2"),
        ];
        let mut room = room(vec![anna], probes, 3)
            .with_survey_policy(SurveyPolicy::Declared)
            .unwrap();

        let output = room.run("v0").await.unwrap();

        let fired: Vec<(&str, usize)> = output
            .survey_question
            .iter()
            .map(|q| (q.question_id.as_str(), q.iteration))
            .collect();
        assert_eq!(fired, vec![("start", 0), ("end", 3)]);
    }

    #[tokio::test]
    async fn test_copied_persona_is_contract_violation() {
        let copy = Arc::new(Persona::new("scripted", "Anna", ""));
        let anna = ScriptedParticipant::new("Anna", Behavior::Impersonate(copy), Behavior::Answer);
        let mut room = room(vec![anna], vec![], 1);

        let err = room.run("v0").await.unwrap_err();

        assert!(matches!(
            err,
            RunSessionError::ContractViolation { ref reason, .. } if reason.contains("copy")
        ));
        assert_eq!(room.session_length(), 0);
    }

    #[test]
    fn test_roster_mismatch_rejected() {
        let anna: Arc<dyn Participant> = ScriptedParticipant::answering("Anna");
        let err = SessionRoom::new(
            "s",
            vec![],
            vec![anna],
            Host::new(HostKind::RoundRobin, 2, 0).unwrap(),
            EndType::iteration(1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::RosterMismatch { host: 2, roster: 1 }
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        let host = Host::RoundRobin(parley_domain::RoundRobinHost::new(1, 0).unwrap());
        let err = SessionRoom::new("s", vec![], vec![], host, EndType::iteration(1)).unwrap_err();
        assert!(matches!(err, ConfigError::Domain(DomainError::EmptyRoster)));
    }

    #[tokio::test]
    async fn test_snapshot_and_restore_resume() {
        let anna = ScriptedParticipant::answering("Anna");
        let ben = ScriptedParticipant::answering("Ben");
        let mut first = room(vec![anna, ben], vec![], 2);
        first.run("v1").await.unwrap();

        let mut snapshot = first.snapshot();
        snapshot.end_type = EndType::iteration(4);

        let registry = ParticipantRegistry::new().register("scripted", |spec: &PersonSpec| {
            Ok(ScriptedParticipant::answering(&spec.name) as Arc<dyn Participant>)
        });
        let mut resumed = SessionRoom::restore(snapshot, &registry).unwrap();
        assert_eq!(resumed.session_length(), 2);
        assert_eq!(resumed.prompt_version(), "v1");

        let output = resumed.run("v1").await.unwrap();

        assert_eq!(output.chat_entry.len(), 2);
        let speakers: Vec<&str> = resumed
            .chat_room()
            .iter()
            .map(|e| e.entity().name())
            .collect();
        assert_eq!(speakers, vec!["Anna", "Ben", "Anna", "Ben"]);
    }

    /// Registry whose participants remember the settings they were built with
    fn recording_registry(built: Arc<Mutex<Vec<PersonSettings>>>) -> ParticipantRegistry {
        ParticipantRegistry::new().register("scripted", move |spec: &PersonSpec| {
            built.lock().unwrap().push(spec.extra.clone());
            Ok(ScriptedParticipant::answering(&spec.name) as Arc<dyn Participant>)
        })
    }

    #[tokio::test]
    async fn test_restore_rebuilds_participants_with_their_settings() {
        let config: SessionConfig = serde_json::from_value(json!({
            "experiment": {"scenario": "Tempolimit", "survey_questions": []},
            "host": {"class": "Round Robin Host", "start_person_index": 0},
            "persons": [
                {"class": "scripted", "name": "Anna", "model": "mistral-7b"},
                {"class": "scripted", "name": "Ben"}
            ],
            "endType": {"class": "iteration", "max_num_msgs": 1}
        }))
        .unwrap();
        let built = Arc::new(Mutex::new(Vec::new()));
        let registry = recording_registry(Arc::clone(&built));

        let mut first = SessionRoom::from_config(&config, &registry).unwrap();
        first.run("v0").await.unwrap();

        let json = serde_json::to_string(&first.snapshot()).unwrap();
        let mut snapshot = serde_json::from_str::<SessionSnapshot>(&json)
            .unwrap()
            .relinked();
        snapshot.end_type = EndType::iteration(2);
        assert_eq!(snapshot.settings_of(0)["model"], json!("mistral-7b"));

        built.lock().unwrap().clear();
        let mut resumed = SessionRoom::restore(snapshot, &registry).unwrap();
        assert_eq!(built.lock().unwrap()[0]["model"], json!("mistral-7b"));
        assert!(built.lock().unwrap()[1].is_empty());

        resumed.run("v0").await.unwrap();
        assert_eq!(resumed.snapshot().settings_of(0)["model"], json!("mistral-7b"));
    }
}
