//! Run Session use case
//!
//! Builds a [`SessionRoom`] from a session file, runs it, and optionally
//! persists the finished session.

use super::session_room::{RunSessionError, SessionRoom};
use crate::config::{RunParams, SessionConfig};
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::progress::{NoProgress, SessionProgressNotifier};
use crate::ports::session_store::SessionStore;
use crate::registry::ParticipantRegistry;
use parley_domain::{SessionOutput, SessionSnapshot};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    pub config: SessionConfig,
    pub params: RunParams,
    /// Where to persist the whole session once it finished
    pub save_session: Option<PathBuf>,
}

impl RunSessionInput {
    pub fn new(config: SessionConfig, params: RunParams) -> Self {
        Self {
            config,
            params,
            save_session: None,
        }
    }

    pub fn saving_session_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_session = Some(path.into());
        self
    }
}

/// Use case for running one session
pub struct RunSessionUseCase {
    registry: Arc<ParticipantRegistry>,
    store: Arc<dyn SessionStore>,
    progress: Arc<dyn SessionProgressNotifier>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RunSessionUseCase {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            store: self.store.clone(),
            progress: self.progress.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RunSessionUseCase {
    pub fn new(registry: Arc<ParticipantRegistry>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            registry,
            store,
            progress: Arc::new(NoProgress),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn SessionProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Build the room for `input` without running it
    pub fn prepare(&self, input: &RunSessionInput) -> Result<SessionRoom, RunSessionError> {
        Ok(SessionRoom::from_config(&input.config, &self.registry)?
            .with_params(&input.params)?
            .with_progress(self.progress.clone())
            .with_conversation_logger(self.conversation_logger.clone()))
    }

    /// Rebuild a saved session with this use case's participants and observers
    pub fn restore(
        &self,
        snapshot: SessionSnapshot,
        params: &RunParams,
    ) -> Result<SessionRoom, RunSessionError> {
        Ok(SessionRoom::restore(snapshot, &self.registry)?
            .with_params(params)?
            .with_progress(self.progress.clone())
            .with_conversation_logger(self.conversation_logger.clone()))
    }

    pub async fn execute(&self, input: RunSessionInput) -> Result<SessionOutput, RunSessionError> {
        let mut room = self.prepare(&input)?;
        self.run_room(&mut room, &input.params, input.save_session)
            .await
    }

    /// Continue a previously built or restored room
    pub async fn run_room(
        &self,
        room: &mut SessionRoom,
        params: &RunParams,
        save_session: Option<PathBuf>,
    ) -> Result<SessionOutput, RunSessionError> {
        let output = room.run(&params.prompt_version).await?;

        if let Some(path) = save_session {
            info!("Saving session to {}", path.display());
            if let Err(source) = self.store.save(&room.snapshot(), &path) {
                warn!("Could not save session to {}: {}", path.display(), source);
                return Err(RunSessionError::Persistence {
                    source,
                    output: Box::new(output),
                });
            }
        }
        Ok(output)
    }
}
