//! Pure combat resolution: damage for one technique use, the NPC's action
//! choice, and the randomness seam that makes both deterministic in tests.

use crate::constants::{
    BASIC_ATTACK_MAX, BASIC_ATTACK_MIN, DAMAGE_JITTER, EFFECT_CRITICAL_CHANCE,
    EFFECT_DAMAGE_BOOST, MIN_TECHNIQUE_DAMAGE,
};
use crate::services::catalog::Technique;
use rand::Rng;

/// Randomness used by combat resolution. Blanket-implemented for every
/// `rand::Rng`, so production code hands the engine a `StdRng` while tests
/// can script exact rolls.
pub trait CombatRng: Send {
    /// Uniform integer in the inclusive range `[min, max]`.
    fn roll(&mut self, min: i32, max: i32) -> i32;
    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + Send> CombatRng for R {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        self.random_range(min..=max)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

/// Damage dealt by one use of `technique`.
///
/// Base damage plus a symmetric jitter, then the recognized effects:
/// `damage_boost` adds its magnitude and `critical_chance` doubles the total
/// on a successful percentage roll. Unrecognized effect keys are ignored.
/// The result is clamped so a technique always deals at least 1 damage.
pub fn resolve_damage(technique: &Technique, rng: &mut dyn CombatRng) -> i32 {
    let mut damage = technique.base_damage + rng.roll(-DAMAGE_JITTER, DAMAGE_JITTER);
    if let Some(boost) = technique.effects.get(EFFECT_DAMAGE_BOOST) {
        damage += boost;
    }
    if let Some(chance) = technique.effects.get(EFFECT_CRITICAL_CHANCE)
        && rng.roll(0, 99) < *chance
    {
        damage *= 2;
    }
    damage.max(MIN_TECHNIQUE_DAMAGE)
}

/// Apply damage to a health value. Health never drops below zero.
pub fn apply_damage(health: i32, damage: i32) -> i32 {
    (health - damage).max(0)
}

/// Damage of the mana-free fallback swing an NPC uses when it has no usable
/// technique.
pub fn basic_attack_damage(rng: &mut dyn CombatRng) -> i32 {
    rng.roll(BASIC_ATTACK_MIN, BASIC_ATTACK_MAX)
}

/// The NPC's action for its half of the round: one uniform draw from its
/// known techniques, kept only if the NPC can pay its mana cost. `None`
/// means the NPC falls back to a basic attack. The draw happens before the
/// affordability check, so a mana-starved NPC does not reroll onto a cheaper
/// technique.
pub fn choose_npc_action<'a>(
    known: &'a [Technique],
    npc_mana: i32,
    rng: &mut dyn CombatRng,
) -> Option<&'a Technique> {
    if known.is_empty() {
        return None;
    }
    let candidate = &known[rng.pick(known.len())];
    if candidate.mana_cost > npc_mana {
        return None;
    }
    Some(candidate)
}
