//! In-memory collaborator implementations.
//!
//! These back the integration tests and are enough for a single-process
//! deployment without a database. Each mirrors the contract of its Postgres
//! counterpart in `crate::database`.

use crate::duel::state::{Duel, DuelId, DuelStatus, NpcId, PlayerId, TechniqueId};
use crate::error::ServiceError;
use crate::services::catalog::{Technique, TechniqueCatalog};
use crate::services::directory::{Npc, NpcDirectory, Player, PlayerDirectory};
use crate::services::social::{NarrativeService, RelationshipService, ReputationService};
use crate::services::store::DuelStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
pub struct MemoryDuelStore {
    duels: RwLock<HashMap<DuelId, Duel>>,
}

impl MemoryDuelStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DuelStore for MemoryDuelStore {
    async fn load(&self, duel_id: &str) -> Result<Option<Duel>, ServiceError> {
        Ok(self.duels.read().await.get(duel_id).cloned())
    }

    async fn save(&self, duel: &Duel) -> Result<(), ServiceError> {
        self.duels
            .write()
            .await
            .insert(duel.id.clone(), duel.clone());
        Ok(())
    }

    async fn player_duels(
        &self,
        player_id: PlayerId,
    ) -> Result<Vec<(DuelId, DuelStatus)>, ServiceError> {
        Ok(self
            .duels
            .read()
            .await
            .values()
            .filter(|duel| duel.player_id == player_id)
            .map(|duel| (duel.id.clone(), duel.status))
            .collect())
    }
}

/// Player and NPC roster in one struct, since a test fixture nearly always
/// wants both.
#[derive(Default)]
pub struct MemoryDirectory {
    players: RwLock<HashMap<PlayerId, Player>>,
    npcs: RwLock<HashMap<NpcId, Npc>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_player(&self, id: PlayerId, name: &str) {
        self.players.write().await.insert(
            id,
            Player {
                id,
                name: name.to_string(),
            },
        );
    }

    pub async fn add_npc(&self, id: NpcId, name: &str) {
        self.npcs.write().await.insert(
            id,
            Npc {
                id,
                name: name.to_string(),
            },
        );
    }
}

#[async_trait]
impl PlayerDirectory for MemoryDirectory {
    async fn find(&self, player_id: PlayerId) -> Result<Option<Player>, ServiceError> {
        Ok(self.players.read().await.get(&player_id).cloned())
    }
}

#[async_trait]
impl NpcDirectory for MemoryDirectory {
    async fn find(&self, npc_id: NpcId) -> Result<Option<Npc>, ServiceError> {
        Ok(self.npcs.read().await.get(&npc_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryCatalog {
    techniques: RwLock<HashMap<TechniqueId, Technique>>,
    player_known: RwLock<HashMap<PlayerId, Vec<TechniqueId>>>,
    npc_known: RwLock<HashMap<NpcId, Vec<TechniqueId>>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a technique definition. Knowing it is a separate step.
    pub async fn insert(&self, technique: Technique) {
        self.techniques
            .write()
            .await
            .insert(technique.id, technique);
    }

    pub async fn teach_player(&self, player_id: PlayerId, technique_id: TechniqueId) {
        self.player_known
            .write()
            .await
            .entry(player_id)
            .or_default()
            .push(technique_id);
    }

    pub async fn teach_npc(&self, npc_id: NpcId, technique_id: TechniqueId) {
        self.npc_known
            .write()
            .await
            .entry(npc_id)
            .or_default()
            .push(technique_id);
    }

    async fn resolve(&self, ids: &[TechniqueId]) -> Vec<Technique> {
        let techniques = self.techniques.read().await;
        ids.iter()
            .filter_map(|id| techniques.get(id).cloned())
            .collect()
    }
}

#[async_trait]
impl TechniqueCatalog for MemoryCatalog {
    async fn player_techniques(&self, player_id: PlayerId) -> Result<Vec<Technique>, ServiceError> {
        let ids = self
            .player_known
            .read()
            .await
            .get(&player_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.resolve(&ids).await)
    }

    async fn npc_techniques(&self, npc_id: NpcId) -> Result<Vec<Technique>, ServiceError> {
        let ids = self
            .npc_known
            .read()
            .await
            .get(&npc_id)
            .cloned()
            .unwrap_or_default();
        Ok(self.resolve(&ids).await)
    }

    async fn find(&self, technique_id: TechniqueId) -> Result<Option<Technique>, ServiceError> {
        Ok(self.techniques.read().await.get(&technique_id).cloned())
    }
}

/// Records every adjustment instead of delivering it anywhere. Tests count
/// the recorded events to pin down the propagate-exactly-once guarantee.
#[derive(Default)]
pub struct MemorySocial {
    fail: AtomicBool,
    reputation: Mutex<Vec<(PlayerId, i32)>>,
    affinity: Mutex<Vec<(PlayerId, NpcId, i32)>>,
    outcomes: Mutex<Vec<(PlayerId, NpcId, bool)>>,
}

impl MemorySocial {
    pub fn new() -> Self {
        Self::default()
    }

    /// A social backend whose every call fails, for exercising the
    /// best-effort propagation path.
    pub fn failing() -> Self {
        let social = Self::default();
        social.fail.store(true, Ordering::Relaxed);
        social
    }

    fn check(&self) -> Result<(), ServiceError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(ServiceError::Backend("social backend offline".to_string()));
        }
        Ok(())
    }

    pub async fn reputation_events(&self) -> Vec<(PlayerId, i32)> {
        self.reputation.lock().await.clone()
    }

    pub async fn affinity_events(&self) -> Vec<(PlayerId, NpcId, i32)> {
        self.affinity.lock().await.clone()
    }

    pub async fn outcome_events(&self) -> Vec<(PlayerId, NpcId, bool)> {
        self.outcomes.lock().await.clone()
    }
}

#[async_trait]
impl ReputationService for MemorySocial {
    async fn adjust(&self, player_id: PlayerId, delta: i32) -> Result<(), ServiceError> {
        self.check()?;
        self.reputation.lock().await.push((player_id, delta));
        Ok(())
    }
}

#[async_trait]
impl RelationshipService for MemorySocial {
    async fn adjust(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        delta: i32,
    ) -> Result<(), ServiceError> {
        self.check()?;
        self.affinity.lock().await.push((player_id, npc_id, delta));
        Ok(())
    }
}

#[async_trait]
impl NarrativeService for MemorySocial {
    async fn notify_duel_outcome(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
        player_won: bool,
    ) -> Result<(), ServiceError> {
        self.check()?;
        self.outcomes
            .lock()
            .await
            .push((player_id, npc_id, player_won));
        Ok(())
    }
}
