//! Persistence boundary for duels.
//!
//! The engine treats storage as a collaborator: it loads a duel, mutates its
//! own copy, and saves the full state back. Serializing concurrent writers
//! on one duel is the engine's job, not the store's.

use crate::duel::state::{Duel, DuelId, DuelStatus, PlayerId};
use crate::error::ServiceError;
use async_trait::async_trait;

#[async_trait]
pub trait DuelStore: Send + Sync {
    async fn load(&self, duel_id: &str) -> Result<Option<Duel>, ServiceError>;

    /// Insert-or-replace the full duel state, log included.
    async fn save(&self, duel: &Duel) -> Result<(), ServiceError>;

    /// `(id, status)` for every duel this player has fought, in no
    /// particular order. The engine applies the active-list filter itself.
    async fn player_duels(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<(DuelId, DuelStatus)>, ServiceError>;
}
