//! Defines the core data structures for a duel session.

use crate::constants::RESOURCE_CAP;
use crate::duel::log::DuelLog;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discord user id of the player side of a duel.
pub type PlayerId = i64;
/// Content id of an NPC opponent.
pub type NpcId = i32;
/// Content id of a technique definition.
pub type TechniqueId = i32;
/// Opaque duel identity, assigned at creation and stable for the duel's life.
pub type DuelId = String;

/// Lifecycle of a duel. `Initiated` is recorded when the row is first built
/// but a duel is handed to the player already in `PlayerTurn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "duel_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DuelStatus {
    Initiated,
    PlayerTurn,
    NpcTurn,
    Completed,
    Canceled,
}

impl DuelStatus {
    /// Terminal duels never mutate again; every mutating operation checks
    /// this before touching state.
    pub fn is_terminal(self) -> bool {
        matches!(self, DuelStatus::Completed | DuelStatus::Canceled)
    }
}

/// Full state of one player-versus-NPC duel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duel {
    pub id: DuelId,
    pub player_id: PlayerId,
    pub npc_id: NpcId,
    pub status: DuelStatus,
    pub player_health: i32,
    pub npc_health: i32,
    pub player_mana: i32,
    pub npc_mana: i32,
    /// Last technique each side used, by id. Techniques are referenced from
    /// the catalog, never copied into the duel.
    pub last_player_technique: Option<TechniqueId>,
    pub last_npc_technique: Option<TechniqueId>,
    pub round: i32,
    /// Set exactly once, at the transition to `Completed`.
    pub player_won: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub log: DuelLog,
}

impl Duel {
    /// A freshly created duel: both sides at full health and mana, round 1.
    pub fn new(player_id: PlayerId, npc_id: NpcId) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            player_id,
            npc_id,
            status: DuelStatus::Initiated,
            player_health: RESOURCE_CAP,
            npc_health: RESOURCE_CAP,
            player_mana: RESOURCE_CAP,
            npc_mana: RESOURCE_CAP,
            last_player_technique: None,
            last_npc_technique: None,
            round: 1,
            player_won: None,
            started_at: Utc::now(),
            ended_at: None,
            log: DuelLog::new(),
        }
    }
}
