//! Applies a completed duel's consequences to the wider game.
//!
//! Deliveries are best effort: a failing collaborator is logged and skipped,
//! and the finalized duel stays authoritative either way.

use crate::constants::{
    AFFINITY_LOSS_DELTA, AFFINITY_WIN_DELTA, REPUTATION_LOSS_DELTA, REPUTATION_WIN_DELTA,
};
use crate::duel::state::Duel;
use crate::services::social::{NarrativeService, RelationshipService, ReputationService};
use std::sync::Arc;
use tracing::{instrument, warn};

pub struct OutcomePropagator {
    reputation: Arc<dyn ReputationService>,
    relationship: Arc<dyn RelationshipService>,
    narrative: Arc<dyn NarrativeService>,
}

impl OutcomePropagator {
    pub fn new(
        reputation: Arc<dyn ReputationService>,
        relationship: Arc<dyn RelationshipService>,
        narrative: Arc<dyn NarrativeService>,
    ) -> Self {
        Self {
            reputation,
            relationship,
            narrative,
        }
    }

    /// Deliver reputation, affinity and narrative updates for a finished
    /// duel. Called exactly once per duel, at the `Completed` transition.
    #[instrument(level = "debug", skip(self, duel), fields(duel_id = %duel.id))]
    pub async fn propagate(&self, duel: &Duel) {
        let Some(player_won) = duel.player_won else {
            warn!("propagation requested for a duel without an outcome");
            return;
        };
        let (reputation_delta, affinity_delta) = if player_won {
            (REPUTATION_WIN_DELTA, AFFINITY_WIN_DELTA)
        } else {
            (REPUTATION_LOSS_DELTA, AFFINITY_LOSS_DELTA)
        };
        if let Err(e) = self.reputation.adjust(duel.player_id, reputation_delta).await {
            warn!(error = %e, "reputation adjustment failed");
        }
        if let Err(e) = self
            .relationship
            .adjust(duel.player_id, duel.npc_id, affinity_delta)
            .await
        {
            warn!(error = %e, "affinity adjustment failed");
        }
        if let Err(e) = self
            .narrative
            .notify_duel_outcome(duel.player_id, duel.npc_id, player_won)
            .await
        {
            warn!(error = %e, "narrative notification failed");
        }
    }
}
