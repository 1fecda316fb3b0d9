use async_trait::async_trait;
use duel_engine::duel::state::{NpcId, PlayerId, TechniqueId};
use duel_engine::error::ServiceError;
use duel_engine::services::cache::TtlCache;
use duel_engine::services::catalog::{Technique, TechniqueCatalog, TechniqueKind};
use duel_engine::services::catalog_cache::CachedCatalog;
use duel_engine::services::memory::MemoryCatalog;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Counts every call that reaches the backing catalog.
struct CountingCatalog {
    inner: MemoryCatalog,
    calls: AtomicUsize,
}

impl CountingCatalog {
    fn new(inner: MemoryCatalog) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TechniqueCatalog for CountingCatalog {
    async fn player_techniques(&self, player_id: PlayerId) -> Result<Vec<Technique>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.player_techniques(player_id).await
    }

    async fn npc_techniques(&self, npc_id: NpcId) -> Result<Vec<Technique>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.npc_techniques(npc_id).await
    }

    async fn find(&self, technique_id: TechniqueId) -> Result<Option<Technique>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find(technique_id).await
    }
}

fn ember() -> Technique {
    Technique::new(1, "Ember", TechniqueKind::Attack, 5, 10)
}

#[tokio::test]
async fn ttl_cache_expires_entries() {
    let cache: TtlCache<i32, String> = TtlCache::new(Duration::from_secs(60));
    cache.put(1, "fresh".to_string()).await;
    assert_eq!(cache.get(&1).await.as_deref(), Some("fresh"));
    assert_eq!(cache.get(&2).await, None);

    let expiring: TtlCache<i32, String> = TtlCache::new(Duration::ZERO);
    expiring.put(1, "stale".to_string()).await;
    assert_eq!(expiring.get(&1).await, None);
}

#[tokio::test]
async fn ttl_cache_invalidate_removes_entry() {
    let cache: TtlCache<i32, i32> = TtlCache::new(Duration::from_secs(60));
    cache.put(7, 42).await;
    cache.invalidate(&7).await;
    assert_eq!(cache.get(&7).await, None);
}

#[tokio::test]
async fn cached_catalog_hits_backend_once() {
    let memory = MemoryCatalog::new();
    memory.insert(ember()).await;
    memory.teach_player(5, 1).await;
    let counting = Arc::new(CountingCatalog::new(memory));
    let cached = CachedCatalog::with_ttl(counting.clone(), Duration::from_secs(60));

    assert_eq!(cached.player_techniques(5).await.unwrap().len(), 1);
    assert_eq!(cached.player_techniques(5).await.unwrap().len(), 1);
    assert_eq!(counting.calls(), 1, "second read served from cache");

    assert!(cached.find(1).await.unwrap().is_some());
    assert!(cached.find(1).await.unwrap().is_some());
    assert_eq!(counting.calls(), 2);
}

#[tokio::test]
async fn zero_ttl_always_refetches() {
    let memory = MemoryCatalog::new();
    memory.insert(ember()).await;
    memory.teach_npc(3, 1).await;
    let counting = Arc::new(CountingCatalog::new(memory));
    let cached = CachedCatalog::with_ttl(counting.clone(), Duration::ZERO);

    cached.npc_techniques(3).await.unwrap();
    cached.npc_techniques(3).await.unwrap();
    assert_eq!(counting.calls(), 2);
}

#[tokio::test]
async fn absent_techniques_are_not_cached() {
    let counting = Arc::new(CountingCatalog::new(MemoryCatalog::new()));
    let cached = CachedCatalog::with_ttl(counting.clone(), Duration::from_secs(60));

    assert!(cached.find(99).await.unwrap().is_none());
    assert!(cached.find(99).await.unwrap().is_none());
    assert_eq!(counting.calls(), 2, "misses go to the backend each time");
}
