//! Duel persistence: full-state upserts plus the per-player listing behind
//! the active-duel filter.

use super::models::{DuelLogRow, DuelRow, assemble_duel};
use crate::duel::state::{Duel, DuelId, DuelStatus, PlayerId};
use crate::error::ServiceError;
use crate::services::store::DuelStore;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

#[instrument(level = "debug", skip(pool))]
pub async fn get_duel(pool: &PgPool, duel_id: &str) -> Result<Option<Duel>, sqlx::Error> {
    let Some(row) = sqlx::query_as::<_, DuelRow>(
        "SELECT duel_id, user_id, npc_id, status, player_health, npc_health, player_mana, \
         npc_mana, last_player_technique, last_npc_technique, round, player_won, started_at, \
         ended_at FROM duels WHERE duel_id = $1",
    )
    .bind(duel_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };
    let log_rows = sqlx::query_as::<_, DuelLogRow>(
        "SELECT round, entry FROM duel_log WHERE duel_id = $1 ORDER BY round",
    )
    .bind(duel_id)
    .fetch_all(pool)
    .await?;
    Ok(Some(assemble_duel(row, log_rows)))
}

/// Insert-or-replace the duel row and its log rows in one transaction.
#[instrument(level = "debug", skip(pool, duel), fields(duel_id = %duel.id))]
pub async fn upsert_duel(pool: &PgPool, duel: &Duel) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO duels (duel_id, user_id, npc_id, status, player_health, npc_health, \
         player_mana, npc_mana, last_player_technique, last_npc_technique, round, player_won, \
         started_at, ended_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (duel_id) DO UPDATE SET \
           status = EXCLUDED.status, \
           player_health = EXCLUDED.player_health, \
           npc_health = EXCLUDED.npc_health, \
           player_mana = EXCLUDED.player_mana, \
           npc_mana = EXCLUDED.npc_mana, \
           last_player_technique = EXCLUDED.last_player_technique, \
           last_npc_technique = EXCLUDED.last_npc_technique, \
           round = EXCLUDED.round, \
           player_won = EXCLUDED.player_won, \
           ended_at = EXCLUDED.ended_at",
    )
    .bind(&duel.id)
    .bind(duel.player_id)
    .bind(duel.npc_id)
    .bind(duel.status)
    .bind(duel.player_health)
    .bind(duel.npc_health)
    .bind(duel.player_mana)
    .bind(duel.npc_mana)
    .bind(duel.last_player_technique)
    .bind(duel.last_npc_technique)
    .bind(duel.round)
    .bind(duel.player_won)
    .bind(duel.started_at)
    .bind(duel.ended_at)
    .execute(&mut *tx)
    .await?;
    // Rounds are append-only: re-upserting the full log touches at most the
    // current round's text.
    for (round, entry) in duel.log.iter() {
        sqlx::query(
            "INSERT INTO duel_log (duel_id, round, entry) VALUES ($1, $2, $3) \
             ON CONFLICT (duel_id, round) DO UPDATE SET entry = EXCLUDED.entry",
        )
        .bind(&duel.id)
        .bind(round)
        .bind(entry)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}

#[instrument(level = "debug", skip(pool))]
pub async fn list_player_duels(
    pool: &PgPool,
    player_id: PlayerId,
) -> Result<Vec<(DuelId, DuelStatus)>, sqlx::Error> {
    sqlx::query_as::<_, (String, DuelStatus)>(
        "SELECT duel_id, status FROM duels WHERE user_id = $1 ORDER BY started_at",
    )
    .bind(player_id)
    .fetch_all(pool)
    .await
}

/// `DuelStore` backed by Postgres.
pub struct PgDuelStore {
    pool: PgPool,
}

impl PgDuelStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DuelStore for PgDuelStore {
    async fn load(&self, duel_id: &str) -> Result<Option<Duel>, ServiceError> {
        Ok(get_duel(&self.pool, duel_id).await?)
    }

    async fn save(&self, duel: &Duel) -> Result<(), ServiceError> {
        Ok(upsert_duel(&self.pool, duel).await?)
    }

    async fn player_duels(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<(DuelId, DuelStatus)>, ServiceError> {
        Ok(list_player_duels(&self.pool, player_id).await?)
    }
}
