//! Interactive participants

mod human;

pub use human::{HUMAN_CLASS, HumanParticipant, TerminalInput};

use parley_application::{Participant, ParticipantRegistry, PersonSpec};
use std::sync::Arc;

/// Add the interactive participants to `registry`, all reading stdin
pub fn register_interactive(registry: ParticipantRegistry) -> ParticipantRegistry {
    register_interactive_with(registry, TerminalInput::stdin())
}

/// Add the interactive participants, reading answers from `input`
pub fn register_interactive_with(
    registry: ParticipantRegistry,
    input: TerminalInput,
) -> ParticipantRegistry {
    registry.register(HUMAN_CLASS, move |spec: &PersonSpec| {
        Ok(Arc::new(HumanParticipant::from_spec(spec, &input)?) as Arc<dyn Participant>)
    })
}
