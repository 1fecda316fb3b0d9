//! Technique catalog reads: definitions, their effects, and who knows what.

use super::models::{TechniqueEffectRow, TechniqueRow, assemble_technique};
use crate::duel::state::{NpcId, PlayerId, TechniqueId};
use crate::error::ServiceError;
use crate::services::catalog::{Technique, TechniqueCatalog};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

#[instrument(level = "debug", skip(pool))]
pub async fn get_technique(
    pool: &PgPool,
    technique_id: TechniqueId,
) -> Result<Option<Technique>, sqlx::Error> {
    let Some(row) = sqlx::query_as::<_, TechniqueRow>(
        "SELECT technique_id, name, kind, base_damage, mana_cost, cooldown, learnable \
         FROM techniques WHERE technique_id = $1",
    )
    .bind(technique_id)
    .fetch_optional(pool)
    .await?
    else {
        return Ok(None);
    };
    let effects = effects_for(pool, technique_id).await?;
    Ok(Some(assemble_technique(row, effects)))
}

async fn effects_for(
    pool: &PgPool,
    technique_id: TechniqueId,
) -> Result<Vec<TechniqueEffectRow>, sqlx::Error> {
    sqlx::query_as::<_, TechniqueEffectRow>(
        "SELECT effect, magnitude FROM technique_effects WHERE technique_id = $1",
    )
    .bind(technique_id)
    .fetch_all(pool)
    .await
}

/// Shared by the player and NPC lookups: hydrate each technique row with its
/// effect rows.
async fn hydrate(pool: &PgPool, rows: Vec<TechniqueRow>) -> Result<Vec<Technique>, sqlx::Error> {
    let mut techniques = Vec::with_capacity(rows.len());
    for row in rows {
        let effects = effects_for(pool, row.technique_id).await?;
        techniques.push(assemble_technique(row, effects));
    }
    Ok(techniques)
}

#[instrument(level = "debug", skip(pool))]
pub async fn player_techniques(
    pool: &PgPool,
    player_id: PlayerId,
) -> Result<Vec<Technique>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TechniqueRow>(
        "SELECT t.technique_id, t.name, t.kind, t.base_damage, t.mana_cost, t.cooldown, \
         t.learnable FROM techniques t \
         JOIN player_techniques pt ON pt.technique_id = t.technique_id \
         WHERE pt.user_id = $1 ORDER BY t.technique_id",
    )
    .bind(player_id)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

#[instrument(level = "debug", skip(pool))]
pub async fn npc_techniques(pool: &PgPool, npc_id: NpcId) -> Result<Vec<Technique>, sqlx::Error> {
    let rows = sqlx::query_as::<_, TechniqueRow>(
        "SELECT t.technique_id, t.name, t.kind, t.base_damage, t.mana_cost, t.cooldown, \
         t.learnable FROM techniques t \
         JOIN npc_techniques nt ON nt.technique_id = t.technique_id \
         WHERE nt.npc_id = $1 ORDER BY t.technique_id",
    )
    .bind(npc_id)
    .fetch_all(pool)
    .await?;
    hydrate(pool, rows).await
}

/// `TechniqueCatalog` backed by Postgres. Wrap it in a
/// `services::catalog_cache::CachedCatalog` to avoid re-reading known lists
/// every round.
pub struct PgTechniqueCatalog {
    pool: PgPool,
}

impl PgTechniqueCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TechniqueCatalog for PgTechniqueCatalog {
    async fn player_techniques(&self, player_id: PlayerId) -> Result<Vec<Technique>, ServiceError> {
        Ok(player_techniques(&self.pool, player_id).await?)
    }

    async fn npc_techniques(&self, npc_id: NpcId) -> Result<Vec<Technique>, ServiceError> {
        Ok(npc_techniques(&self.pool, npc_id).await?)
    }

    async fn find(&self, technique_id: TechniqueId) -> Result<Option<Technique>, ServiceError> {
        Ok(get_technique(&self.pool, technique_id).await?)
    }
}
