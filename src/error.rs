//! Error taxonomy for duel operations.
//! Every variant is recoverable: the caller surfaces a message and the duel
//! itself is left exactly as it was (no partial writes).

use crate::duel::state::{DuelId, DuelStatus, NpcId, PlayerId, TechniqueId};
use thiserror::Error;

/// Infrastructure failure reported by a collaborator (store, directory,
/// catalog or one of the outcome services). Absence of a record is *not* an
/// error at the collaborator boundary; it is expressed as `Ok(None)` or an
/// empty list and mapped to the matching `DuelError` variant by the engine.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("backend failure: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum DuelError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("npc {0} not found")]
    NpcNotFound(NpcId),

    #[error("duel {0} not found")]
    DuelNotFound(DuelId),

    #[error("technique {0} not found")]
    TechniqueNotFound(TechniqueId),

    #[error("duel {id} is not awaiting a player action (status {status:?})")]
    InvalidState { id: DuelId, status: DuelStatus },

    #[error("insufficient mana: technique costs {required}, player has {available}")]
    InsufficientMana { required: i32, available: i32 },

    #[error(transparent)]
    Service(#[from] ServiceError),
}
