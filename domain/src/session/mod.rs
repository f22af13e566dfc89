//! Session domain.
//!
//! - [`output::SessionOutput`]: transcript and survey answers of one run
//! - [`snapshot::SessionSnapshot`]: persisted form of a whole session

pub mod output;
pub mod snapshot;

pub use output::SessionOutput;
pub use snapshot::{PersonSettings, SessionSnapshot};
