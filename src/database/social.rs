//! Reputation, relationship and narrative write paths for duel outcomes.
//! The counters are upserted so a player's first duel creates their row.

use crate::duel::state::{NpcId, PlayerId};
use crate::error::ServiceError;
use crate::services::social::{NarrativeService, RelationshipService, ReputationService};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

/// Apply a signed reputation delta, creating the row on first contact.
#[instrument(level = "debug", skip(pool))]
pub async fn adjust_reputation(
    pool: &PgPool,
    player_id: PlayerId,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO player_reputation (user_id, reputation) VALUES ($1, $2) \
         ON CONFLICT (user_id) DO UPDATE \
         SET reputation = player_reputation.reputation + EXCLUDED.reputation",
    )
    .bind(player_id)
    .bind(delta)
    .execute(pool)
    .await?;
    Ok(())
}

/// Apply a signed affinity delta for one (player, NPC) pair.
#[instrument(level = "debug", skip(pool))]
pub async fn adjust_affinity(
    pool: &PgPool,
    player_id: PlayerId,
    npc_id: NpcId,
    delta: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO npc_relationships (user_id, npc_id, affinity) VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, npc_id) DO UPDATE \
         SET affinity = npc_relationships.affinity + EXCLUDED.affinity",
    )
    .bind(player_id)
    .bind(npc_id)
    .bind(delta)
    .execute(pool)
    .await?;
    Ok(())
}

/// Record a duel outcome for the narrative layer to pick up.
#[instrument(level = "debug", skip(pool))]
pub async fn record_duel_outcome(
    pool: &PgPool,
    player_id: PlayerId,
    npc_id: NpcId,
    player_won: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO narrative_events (user_id, npc_id, event, player_won) \
         VALUES ($1, $2, 'duel_outcome', $3)",
    )
    .bind(player_id)
    .bind(npc_id)
    .bind(player_won)
    .execute(pool)
    .await?;
    Ok(())
}

pub struct PgReputationService {
    pool: PgPool,
}

impl PgReputationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReputationService for PgReputationService {
    async fn adjust(&self, player_id: PlayerId, delta: i32) -> Result<(), ServiceError> {
        Ok(adjust_reputation(&self.pool, player_id, delta).await?)
    }
}

pub struct PgRelationshipService {
    pool: PgPool,
}

impl PgRelationshipService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationshipService for PgRelationshipService {
    async fn adjust(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        delta: i32,
    ) -> Result<(), ServiceError> {
        Ok(adjust_affinity(&self.pool, player_id, npc_id, delta).await?)
    }
}

pub struct PgNarrativeService {
    pool: PgPool,
}

impl PgNarrativeService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NarrativeService for PgNarrativeService {
    async fn notify_duel_outcome(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        player_won: bool,
    ) -> Result<(), ServiceError> {
        Ok(record_duel_outcome(&self.pool, player_id, npc_id, player_won).await?)
    }
}
