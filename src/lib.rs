//! Turn-based duel engine for a narrative Discord game.
//!
//! Resolves player-versus-NPC duels: technique use with mana costs and
//! randomized damage, a synchronous NPC answer in the same call, round
//! progression, and outcome propagation into reputation, relationships and
//! narrative hooks. The chat-facing command and rendering layer lives in the
//! host bot and drives this crate through `DuelEngine`.

pub mod constants;
pub mod database;
pub mod duel;
pub mod error;
pub mod services;

// Convenient re-exports for frequently used types.
pub use duel::engine::{DuelEngine, DuelStart};
pub use duel::state::{Duel, DuelStatus};
pub use error::{DuelError, ServiceError};
