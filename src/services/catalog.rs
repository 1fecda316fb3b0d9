//! Technique definitions and the catalog that serves them.
//!
//! The catalog is read-only from the engine's point of view: learning and
//! evolving techniques happen elsewhere in the game, between duels.

use crate::duel::state::{NpcId, PlayerId, TechniqueId};
use crate::error::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Broad category of a technique. Descriptive only: no kind gates usability
/// in the base turn algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "technique_kind", rename_all = "PascalCase")]
#[serde(rename_all = "snake_case")]
pub enum TechniqueKind {
    Attack,
    Defense,
    Support,
    Special,
    Ultimate,
}

/// A reusable combat move, owned by the content catalog and referenced by id
/// from duels. Definitions are immutable while a duel runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technique {
    pub id: TechniqueId,
    pub name: String,
    pub kind: TechniqueKind,
    pub base_damage: i32,
    pub mana_cost: i32,
    /// Stored on the definition but not enforced by the turn algorithm.
    pub cooldown: i32,
    /// Effect name to integer magnitude. See the `EFFECT_*` constants for
    /// the keys combat resolution recognizes; unknown keys are ignored.
    pub effects: HashMap<String, i32>,
    /// Whether a combatant may newly acquire this technique. Does not gate
    /// using a technique that is already known.
    pub learnable: bool,
}

impl Technique {
    pub fn new(
        id: TechniqueId,
        name: &str,
        kind: TechniqueKind,
        base_damage: i32,
        mana_cost: i32,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            kind,
            base_damage,
            mana_cost,
            cooldown: 0,
            effects: HashMap::new(),
            learnable: true,
        }
    }

    /// Builder-style helper for attaching an effect, used by content seeding
    /// and tests.
    pub fn with_effect(mut self, name: &str, magnitude: i32) -> Self {
        self.effects.insert(name.to_string(), magnitude);
        self
    }
}

#[async_trait]
pub trait TechniqueCatalog: Send + Sync {
    /// Every technique the player currently knows. An empty list is a valid
    /// answer, not an error.
    async fn player_techniques(&self, player_id: PlayerId) -> Result<Vec<Technique>, ServiceError>;

    /// Every technique the NPC currently knows. Empty is valid here too; the
    /// engine substitutes a basic attack on the NPC's turn.
    async fn npc_techniques(&self, npc_id: NpcId) -> Result<Vec<Technique>, ServiceError>;

    /// Look up one technique definition by id.
    async fn find(&self, technique_id: TechniqueId) -> Result<Option<Technique>, ServiceError>;
}
