//! Player and NPC lookups, trimmed to the slice duels need.

use super::models::{NpcRow, PlayerRow};
use crate::duel::state::{NpcId, PlayerId};
use crate::error::ServiceError;
use crate::services::directory::{Npc, NpcDirectory, Player, PlayerDirectory};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

#[instrument(level = "debug", skip(pool))]
pub async fn get_player(
    pool: &PgPool,
    player_id: PlayerId,
) -> Result<Option<Player>, sqlx::Error> {
    let row = sqlx::query_as::<_, PlayerRow>(
        "SELECT user_id, display_name FROM players WHERE user_id = $1",
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Player::from))
}

#[instrument(level = "debug", skip(pool))]
pub async fn get_npc(pool: &PgPool, npc_id: NpcId) -> Result<Option<Npc>, sqlx::Error> {
    let row = sqlx::query_as::<_, NpcRow>("SELECT npc_id, name FROM npcs WHERE npc_id = $1")
        .bind(npc_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Npc::from))
}

pub struct PgPlayerDirectory {
    pool: PgPool,
}

impl PgPlayerDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerDirectory for PgPlayerDirectory {
    async fn find(&self, player_id: PlayerId) -> Result<Option<Player>, ServiceError> {
        Ok(get_player(&self.pool, player_id).await?)
    }
}

pub struct PgNpcDirectory {
    pool: PgPool,
}

impl PgNpcDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NpcDirectory for PgNpcDirectory {
    async fn find(&self, npc_id: NpcId) -> Result<Option<Npc>, ServiceError> {
        Ok(get_npc(&self.pool, npc_id).await?)
    }
}
