//! Outcome side-effect services: server-wide reputation, per-NPC affinity,
//! and the narrative hook that lets story content branch on a duel result.

use crate::duel::state::{NpcId, PlayerId};
use crate::error::ServiceError;
use async_trait::async_trait;

#[async_trait]
pub trait ReputationService: Send + Sync {
    /// Apply a signed delta to the player's server-wide standing.
    async fn adjust(&self, player_id: PlayerId, delta: i32) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait RelationshipService: Send + Sync {
    /// Apply a signed delta to the affinity between one player and one NPC.
    async fn adjust(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        delta: i32,
    ) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait NarrativeService: Send + Sync {
    /// Tell the story layer how a duel ended.
    async fn notify_duel_outcome(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        player_won: bool,
    ) -> Result<(), ServiceError>;
}
