//! The duel state machine: creation, turn execution, round progression and
//! termination.
//!
//! One `submit_technique` call resolves the player's action *and* the NPC's
//! answer before returning, so a duel observed from outside is always either
//! waiting for the player or finished. Calls racing on the same duel id are
//! serialized by a per-duel lock.

use crate::constants::{MANA_REGEN_PER_ROUND, RESOURCE_CAP};
use crate::duel::outcome::OutcomePropagator;
use crate::duel::resolver::{self, CombatRng};
use crate::duel::state::{Duel, DuelId, DuelStatus, NpcId, PlayerId, TechniqueId};
use crate::error::DuelError;
use crate::services::catalog::{Technique, TechniqueCatalog};
use crate::services::directory::{NpcDirectory, PlayerDirectory};
use crate::services::store::DuelStore;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument};

/// A freshly initiated duel plus the techniques the player can open with.
#[derive(Debug, Clone, Serialize)]
pub struct DuelStart {
    pub duel: Duel,
    pub techniques: Vec<Technique>,
}

pub struct DuelEngine {
    store: Arc<dyn DuelStore>,
    players: Arc<dyn PlayerDirectory>,
    npcs: Arc<dyn NpcDirectory>,
    catalog: Arc<dyn TechniqueCatalog>,
    outcomes: OutcomePropagator,
    rng: Mutex<Box<dyn CombatRng>>,
    /// One mutex per duel id, present only while a mutating call on that id
    /// is in flight. Every `submit_technique`/`cancel` sweeps its entry on
    /// the way out via `release_duel_lock`, so unknown ids and late calls
    /// against finished duels cannot grow the map.
    duel_locks: RwLock<HashMap<DuelId, Arc<Mutex<()>>>>,
}

impl DuelEngine {
    pub fn new(
        store: Arc<dyn DuelStore>,
        players: Arc<dyn PlayerDirectory>,
        npcs: Arc<dyn NpcDirectory>,
        catalog: Arc<dyn TechniqueCatalog>,
        outcomes: OutcomePropagator,
    ) -> Self {
        Self {
            store,
            players,
            npcs,
            catalog,
            outcomes,
            rng: Mutex::new(Box::new(StdRng::from_os_rng())),
            duel_locks: RwLock::new(HashMap::new()),
        }
    }

    /// Swap in a caller-controlled randomness source. Tests use this with a
    /// seeded or scripted rng to make whole duels deterministic.
    pub fn with_rng(mut self, rng: Box<dyn CombatRng>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    /// Lock handle serializing mutations of one duel id.
    async fn duel_lock(&self, duel_id: &str) -> Arc<Mutex<()>> {
        // Fast path: read lock only.
        if let Some(lock) = self.duel_locks.read().await.get(duel_id) {
            return Arc::clone(lock);
        }
        let mut locks = self.duel_locks.write().await;
        Arc::clone(
            locks
                .entry(duel_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Drop the map entry for `duel_id` unless another task still holds the
    /// lock. A strong count of 2 means the entry is referenced only by the
    /// map and the calling task; a waiter holds a third handle, which keeps
    /// the entry alive so concurrent callers keep sharing one lock.
    async fn release_duel_lock(&self, duel_id: &str) {
        let mut locks = self.duel_locks.write().await;
        if let Some(lock) = locks.get(duel_id)
            && Arc::strong_count(lock) == 2
        {
            locks.remove(duel_id);
        }
    }

    /// Create a duel between a player and an NPC. Both sides start at full
    /// health and mana; the player moves first. The returned state carries
    /// the player's known techniques for display.
    #[instrument(level = "debug", skip(self))]
    pub async fn initiate(
        &self,
        player_id: PlayerId,
        npc_id: NpcId,
    ) -> Result<DuelStart, DuelError> {
        let player = self
            .players
            .find(player_id)
            .await?
            .ok_or(DuelError::PlayerNotFound(player_id))?;
        let npc = self
            .npcs
            .find(npc_id)
            .await?
            .ok_or(DuelError::NpcNotFound(npc_id))?;

        // Read the display list before the duel exists, so a catalog failure
        // cannot leave an orphaned duel behind.
        let techniques = self.catalog.player_techniques(player_id).await?;

        let mut duel = Duel::new(player_id, npc_id);
        duel.status = DuelStatus::PlayerTurn;
        duel.log.append(
            duel.round,
            &format!("{} challenges {} to a duel!", player.name, npc.name),
        );
        self.store.save(&duel).await?;
        debug!(duel_id = %duel.id, "duel initiated");

        Ok(DuelStart { duel, techniques })
    }

    /// Resolve one full exchange: the player's technique, then the NPC's
    /// answer. Fails without touching the duel when the duel or technique is
    /// unknown, it is not the player's turn, or the player cannot pay the
    /// technique's mana cost.
    #[instrument(level = "debug", skip(self))]
    pub async fn submit_technique(
        &self,
        duel_id: &str,
        technique_id: TechniqueId,
    ) -> Result<Duel, DuelError> {
        let lock = self.duel_lock(duel_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.resolve_exchange(duel_id, technique_id).await
        };
        self.release_duel_lock(duel_id).await;
        result
    }

    /// `submit_technique` body, run under the per-duel lock.
    async fn resolve_exchange(
        &self,
        duel_id: &str,
        technique_id: TechniqueId,
    ) -> Result<Duel, DuelError> {
        let mut duel = self
            .store
            .load(duel_id)
            .await?
            .ok_or_else(|| DuelError::DuelNotFound(duel_id.to_string()))?;
        let technique = self
            .catalog
            .find(technique_id)
            .await?
            .ok_or(DuelError::TechniqueNotFound(technique_id))?;
        if duel.status != DuelStatus::PlayerTurn {
            return Err(DuelError::InvalidState {
                id: duel.id,
                status: duel.status,
            });
        }
        if duel.player_mana < technique.mana_cost {
            return Err(DuelError::InsufficientMana {
                required: technique.mana_cost,
                available: duel.player_mana,
            });
        }
        let player = self
            .players
            .find(duel.player_id)
            .await?
            .ok_or(DuelError::PlayerNotFound(duel.player_id))?;
        let npc = self
            .npcs
            .find(duel.npc_id)
            .await?
            .ok_or(DuelError::NpcNotFound(duel.npc_id))?;

        // Player half of the round.
        let damage = {
            let mut rng = self.rng.lock().await;
            resolver::resolve_damage(&technique, &mut **rng)
        };
        duel.npc_health = resolver::apply_damage(duel.npc_health, damage);
        duel.player_mana -= technique.mana_cost;
        duel.last_player_technique = Some(technique.id);
        duel.log.append(
            duel.round,
            &format!(
                "{} uses {} for {} damage!",
                player.name, technique.name, damage
            ),
        );
        if duel.npc_health == 0 {
            self.finalize(&mut duel, true, &player.name, &npc.name).await?;
            return Ok(duel);
        }

        // Fetch the NPC's options before the turn handoff is persisted, so a
        // catalog failure cannot strand the duel mid-exchange.
        let known = self.catalog.npc_techniques(duel.npc_id).await?;
        duel.status = DuelStatus::NpcTurn;
        self.store.save(&duel).await?;

        // NPC half, resolved in the same call.
        {
            let mut rng = self.rng.lock().await;
            match resolver::choose_npc_action(&known, duel.npc_mana, &mut **rng) {
                Some(counter) => {
                    let counter_damage = resolver::resolve_damage(counter, &mut **rng);
                    duel.player_health = resolver::apply_damage(duel.player_health, counter_damage);
                    duel.npc_mana -= counter.mana_cost;
                    duel.last_npc_technique = Some(counter.id);
                    duel.log.append(
                        duel.round,
                        &format!(
                            "{} answers with {} for {} damage!",
                            npc.name, counter.name, counter_damage
                        ),
                    );
                }
                None => {
                    let counter_damage = resolver::basic_attack_damage(&mut **rng);
                    duel.player_health = resolver::apply_damage(duel.player_health, counter_damage);
                    duel.log.append(
                        duel.round,
                        &format!("{} lashes out for {} damage!", npc.name, counter_damage),
                    );
                }
            }
        }
        if duel.player_health == 0 {
            self.finalize(&mut duel, false, &player.name, &npc.name).await?;
            return Ok(duel);
        }

        // Both sides survived: next round, both manas regenerate.
        duel.round += 1;
        duel.player_mana = (duel.player_mana + MANA_REGEN_PER_ROUND).min(RESOURCE_CAP);
        duel.npc_mana = (duel.npc_mana + MANA_REGEN_PER_ROUND).min(RESOURCE_CAP);
        duel.status = DuelStatus::PlayerTurn;
        self.store.save(&duel).await?;
        Ok(duel)
    }

    /// Close out a finished duel: terminal status, timestamps, closing log
    /// line, persist, then the one-and-only outcome propagation.
    async fn finalize(
        &self,
        duel: &mut Duel,
        player_won: bool,
        player_name: &str,
        npc_name: &str,
    ) -> Result<(), DuelError> {
        duel.status = DuelStatus::Completed;
        duel.player_won = Some(player_won);
        duel.ended_at = Some(Utc::now());
        let closing = if player_won {
            format!("{} defeats {}!", player_name, npc_name)
        } else {
            format!("{} stands victorious over {}.", npc_name, player_name)
        };
        duel.log.append(duel.round, &closing);
        self.store.save(duel).await?;
        debug!(duel_id = %duel.id, player_won, "duel completed");
        self.outcomes.propagate(duel).await;
        Ok(())
    }

    /// Explicitly cancel a duel. Completed duels cannot be canceled;
    /// canceling an already-canceled duel succeeds without touching it. No
    /// resources move and no outcome propagation happens.
    #[instrument(level = "debug", skip(self))]
    pub async fn cancel(&self, duel_id: &str) -> Result<bool, DuelError> {
        let lock = self.duel_lock(duel_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply_cancel(duel_id).await
        };
        self.release_duel_lock(duel_id).await;
        result
    }

    /// `cancel` body, run under the per-duel lock.
    async fn apply_cancel(&self, duel_id: &str) -> Result<bool, DuelError> {
        let mut duel = self
            .store
            .load(duel_id)
            .await?
            .ok_or_else(|| DuelError::DuelNotFound(duel_id.to_string()))?;
        match duel.status {
            DuelStatus::Completed => Ok(false),
            DuelStatus::Canceled => Ok(true),
            _ => {
                duel.status = DuelStatus::Canceled;
                duel.ended_at = Some(Utc::now());
                self.store.save(&duel).await?;
                debug!(duel_id = %duel.id, "duel canceled");
                Ok(true)
            }
        }
    }

    /// Read-only snapshot of a duel, log included.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_state(&self, duel_id: &str) -> Result<Duel, DuelError> {
        self.store
            .load(duel_id)
            .await?
            .ok_or_else(|| DuelError::DuelNotFound(duel_id.to_string()))
    }

    /// Ids of this player's duels that have not been fought to completion.
    /// Canceled duels are still listed; only `Completed` is filtered out.
    #[instrument(level = "debug", skip(self))]
    pub async fn list_active(&self, player_id: PlayerId) -> Result<Vec<DuelId>, DuelError> {
        let duels = self.store.player_duels(player_id).await?;
        Ok(duels
            .into_iter()
            .filter(|(_, status)| *status != DuelStatus::Completed)
            .map(|(id, _)| id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::TechniqueKind;
    use crate::services::memory::{MemoryCatalog, MemoryDirectory, MemoryDuelStore, MemorySocial};

    const PLAYER: PlayerId = 7;
    const NPC: NpcId = 2;

    async fn arena() -> DuelEngine {
        let store = Arc::new(MemoryDuelStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        directory.add_player(PLAYER, "Rin").await;
        directory.add_npc(NPC, "Ash Wolf").await;
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.insert(Technique::new(1, "Finisher", TechniqueKind::Ultimate, 200, 0)).await;
        catalog.insert(Technique::new(2, "Tap", TechniqueKind::Attack, 1, 0)).await;
        catalog.teach_player(PLAYER, 1).await;
        catalog.teach_player(PLAYER, 2).await;
        let social = Arc::new(MemorySocial::new());
        let outcomes = OutcomePropagator::new(social.clone(), social.clone(), social);
        DuelEngine::new(store, directory.clone(), directory, catalog, outcomes)
    }

    async fn open_locks(engine: &DuelEngine) -> usize {
        engine.duel_locks.read().await.len()
    }

    #[tokio::test]
    async fn unknown_ids_leave_no_lock_entry() {
        let engine = arena().await;
        for i in 0..50 {
            let id = format!("missing-{i}");
            assert!(matches!(
                engine.submit_technique(&id, 1).await.unwrap_err(),
                DuelError::DuelNotFound(_)
            ));
            assert!(matches!(
                engine.cancel(&id).await.unwrap_err(),
                DuelError::DuelNotFound(_)
            ));
        }
        assert_eq!(open_locks(&engine).await, 0);
    }

    #[tokio::test]
    async fn lock_entries_do_not_outlive_calls() {
        let engine = arena().await;
        let start = engine.initiate(PLAYER, NPC).await.unwrap();

        // A live duel holds no entry between exchanges.
        let duel = engine.submit_technique(&start.duel.id, 2).await.unwrap();
        assert_eq!(duel.status, DuelStatus::PlayerTurn);
        assert_eq!(open_locks(&engine).await, 0);

        // Neither does a finished one, even after late submits and cancels.
        let duel = engine.submit_technique(&start.duel.id, 1).await.unwrap();
        assert_eq!(duel.status, DuelStatus::Completed);
        assert_eq!(open_locks(&engine).await, 0);
        assert!(matches!(
            engine.submit_technique(&start.duel.id, 1).await.unwrap_err(),
            DuelError::InvalidState { .. }
        ));
        assert_eq!(open_locks(&engine).await, 0);
        assert!(!engine.cancel(&start.duel.id).await.unwrap());
        assert_eq!(open_locks(&engine).await, 0);
    }

    #[tokio::test]
    async fn canceled_duels_leave_no_lock_entry() {
        let engine = arena().await;
        let start = engine.initiate(PLAYER, NPC).await.unwrap();
        assert!(engine.cancel(&start.duel.id).await.unwrap());
        assert_eq!(open_locks(&engine).await, 0);

        // The repeated-cancel no-op sweeps its own entry too.
        assert!(engine.cancel(&start.duel.id).await.unwrap());
        assert_eq!(open_locks(&engine).await, 0);
    }
}
