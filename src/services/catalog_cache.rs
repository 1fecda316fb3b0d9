//! Read-through cache in front of a `TechniqueCatalog`.
//!
//! Technique definitions are immutable while a duel runs, so short-TTL
//! memoization of known-technique lists and definition lookups is safe. It
//! saves a backend round trip on every NPC turn of a long duel.

use crate::duel::state::{NpcId, PlayerId, TechniqueId};
use crate::error::ServiceError;
use crate::services::cache::TtlCache;
use crate::services::catalog::{Technique, TechniqueCatalog};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

pub const CATALOG_CACHE_TTL_SECS: u64 = 30;

pub struct CachedCatalog {
    inner: Arc<dyn TechniqueCatalog>,
    player_known: TtlCache<PlayerId, Vec<Technique>>,
    npc_known: TtlCache<NpcId, Vec<Technique>>,
    definitions: TtlCache<TechniqueId, Technique>,
}

impl CachedCatalog {
    pub fn new(inner: Arc<dyn TechniqueCatalog>) -> Self {
        Self::with_ttl(inner, Duration::from_secs(CATALOG_CACHE_TTL_SECS))
    }

    pub fn with_ttl(inner: Arc<dyn TechniqueCatalog>, ttl: Duration) -> Self {
        Self {
            inner,
            player_known: TtlCache::new(ttl),
            npc_known: TtlCache::new(ttl),
            definitions: TtlCache::new(ttl),
        }
    }
}

#[async_trait]
impl TechniqueCatalog for CachedCatalog {
    async fn player_techniques(&self, player_id: PlayerId) -> Result<Vec<Technique>, ServiceError> {
        if let Some(known) = self.player_known.get(&player_id).await {
            return Ok(known);
        }
        let known = self.inner.player_techniques(player_id).await?;
        self.player_known.put(player_id, known.clone()).await;
        Ok(known)
    }

    async fn npc_techniques(&self, npc_id: NpcId) -> Result<Vec<Technique>, ServiceError> {
        if let Some(known) = self.npc_known.get(&npc_id).await {
            return Ok(known);
        }
        let known = self.inner.npc_techniques(npc_id).await?;
        self.npc_known.put(npc_id, known.clone()).await;
        Ok(known)
    }

    async fn find(&self, technique_id: TechniqueId) -> Result<Option<Technique>, ServiceError> {
        if let Some(technique) = self.definitions.get(&technique_id).await {
            return Ok(Some(technique));
        }
        let found = self.inner.find(technique_id).await?;
        // Only hits are cached.
        if let Some(technique) = &found {
            self.definitions.put(technique_id, technique.clone()).await;
        }
        Ok(found)
    }
}
