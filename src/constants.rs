// Central constants for combat balance and outcome deltas.
pub const RESOURCE_CAP: i32 = 100; // health and mana share one cap; also the starting value
pub const MANA_REGEN_PER_ROUND: i32 = 10;
pub const DAMAGE_JITTER: i32 = 2; // symmetric, applied as [-JITTER, +JITTER]
pub const MIN_TECHNIQUE_DAMAGE: i32 = 1; // a landed technique never deals zero
pub const BASIC_ATTACK_MIN: i32 = 5;
pub const BASIC_ATTACK_MAX: i32 = 10;

// Reputation / affinity adjustments applied once per completed duel.
pub const REPUTATION_WIN_DELTA: i32 = 10;
pub const REPUTATION_LOSS_DELTA: i32 = -5;
pub const AFFINITY_WIN_DELTA: i32 = 5;
pub const AFFINITY_LOSS_DELTA: i32 = -2;

// Recognized technique effect keys. Unrecognized keys in an effects map are
// ignored by the resolver rather than rejected.
pub const EFFECT_DAMAGE_BOOST: &str = "damage_boost";
pub const EFFECT_CRITICAL_CHANCE: &str = "critical_chance";
