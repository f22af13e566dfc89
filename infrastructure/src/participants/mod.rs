//! Concrete participants and the default registry
//!
//! | class                           | participant               |
//! |---------------------------------|---------------------------|
//! | `fake`                          | [`FakeParticipant`]       |
//! | `deferred`                      | [`DeferredParticipant`]   |
//! | `person_open_router_completion` | `OpenRouterParticipant`   |
//!
//! The interactive `human` participant lives in the presentation layer and
//! is registered by the binary.

mod deferred;
mod fake;
#[cfg(feature = "openrouter")]
mod open_router;

pub use deferred::{DEFERRED_CLASS, DeferredInbox, DeferredParticipant};
pub use fake::{FAKE_CLASS, FakeParticipant};
#[cfg(feature = "openrouter")]
pub use open_router::{
    OPEN_ROUTER_CLASS, OpenRouterParticipant, OpenRouterSettings, strip_speaker_prefix,
};

use crate::config::FileConfig;
use parley_application::{Participant, ParticipantRegistry, PersonSpec};
use std::sync::Arc;

/// Registry with every participant this crate provides
pub fn default_registry(config: &FileConfig) -> ParticipantRegistry {
    let registry = ParticipantRegistry::new()
        .register(FAKE_CLASS, |spec: &PersonSpec| {
            Ok(Arc::new(FakeParticipant::from_spec(spec)?) as Arc<dyn Participant>)
        })
        .register(DEFERRED_CLASS, |spec: &PersonSpec| {
            Ok(Arc::new(DeferredParticipant::from_spec(spec)?) as Arc<dyn Participant>)
        });

    #[cfg(feature = "openrouter")]
    let registry = {
        let openrouter = config.openrouter.clone();
        registry.register(OPEN_ROUTER_CLASS, move |spec: &PersonSpec| {
            Ok(Arc::new(OpenRouterParticipant::from_spec(spec, &openrouter)?)
                as Arc<dyn Participant>)
        })
    };
    #[cfg(not(feature = "openrouter"))]
    let _ = config;

    registry
}
