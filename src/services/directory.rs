//! Directory lookups for the two sides of a duel.

use crate::duel::state::{NpcId, PlayerId};
use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The slice of a player record a duel needs: identity plus a display name
/// for log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Npc {
    pub id: NpcId,
    pub name: String,
}

#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    async fn find(&self, player_id: PlayerId) -> Result<Option<Player>, ServiceError>;
}

#[async_trait]
pub trait NpcDirectory: Send + Sync {
    async fn find(&self, npc_id: NpcId) -> Result<Option<Npc>, ServiceError>;
}
