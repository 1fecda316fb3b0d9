//! Contains the data structures that map to database tables or query results,
//! plus the assembly helpers that turn rows back into domain types.

use crate::duel::log::DuelLog;
use crate::duel::state::{Duel, DuelStatus};
use crate::services::catalog::{Technique, TechniqueKind};
use crate::services::directory::{Npc, Player};
use sqlx::types::chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DuelRow {
    pub duel_id: String,
    pub user_id: i64,
    pub npc_id: i32,
    pub status: DuelStatus,
    pub player_health: i32,
    pub npc_health: i32,
    pub player_mana: i32,
    pub npc_mana: i32,
    pub last_player_technique: Option<i32>,
    pub last_npc_technique: Option<i32>,
    pub round: i32,
    pub player_won: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct DuelLogRow {
    pub round: i32,
    pub entry: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TechniqueRow {
    pub technique_id: i32,
    pub name: String,
    pub kind: TechniqueKind,
    pub base_damage: i32,
    pub mana_cost: i32,
    pub cooldown: i32,
    pub learnable: bool,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct TechniqueEffectRow {
    pub effect: String,
    pub magnitude: i32,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct PlayerRow {
    pub user_id: i64,
    pub display_name: String,
}

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct NpcRow {
    pub npc_id: i32,
    pub name: String,
}

/// Reassemble a `Duel` from its main row plus its log rows.
pub fn assemble_duel(row: DuelRow, log_rows: Vec<DuelLogRow>) -> Duel {
    let mut log = DuelLog::new();
    for log_row in log_rows {
        log.append(log_row.round, &log_row.entry);
    }
    Duel {
        id: row.duel_id,
        player_id: row.user_id,
        npc_id: row.npc_id,
        status: row.status,
        player_health: row.player_health,
        npc_health: row.npc_health,
        player_mana: row.player_mana,
        npc_mana: row.npc_mana,
        last_player_technique: row.last_player_technique,
        last_npc_technique: row.last_npc_technique,
        round: row.round,
        player_won: row.player_won,
        started_at: row.started_at,
        ended_at: row.ended_at,
        log,
    }
}

/// Reassemble a `Technique` from its main row plus its effect rows.
pub fn assemble_technique(row: TechniqueRow, effects: Vec<TechniqueEffectRow>) -> Technique {
    Technique {
        id: row.technique_id,
        name: row.name,
        kind: row.kind,
        base_damage: row.base_damage,
        mana_cost: row.mana_cost,
        cooldown: row.cooldown,
        effects: effects
            .into_iter()
            .map(|e| (e.effect, e.magnitude))
            .collect::<HashMap<_, _>>(),
        learnable: row.learnable,
    }
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Self {
            id: row.user_id,
            name: row.display_name,
        }
    }
}

impl From<NpcRow> for Npc {
    fn from(row: NpcRow) -> Self {
        Self {
            id: row.npc_id,
            name: row.name,
        }
    }
}
