//! Sessions: the keyed registry, the orchestrator and the idle sweeper.

pub mod engine;
pub mod registry;
pub mod sweeper;
pub mod types;

pub use engine::Engine;
pub use registry::Registry;
pub use sweeper::spawn_sweeper;
pub use types::{
    ChatId, GameSession, MoveReport, Outcome, Participant, PlayerId, SessionKey, SessionSnapshot,
    StartReport, COMPUTER_NAME,
};
