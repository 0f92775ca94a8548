use super::generation::{compose_name, roll_affix_set, roll_affix_value, tier_band};
use super::types::{Item, Rarity};
use crate::core::constants::{OPTIMIZE_COST, RECALIBRATE_COST, REFORGE_COST};
use crate::core::errors::{EngineError, EngineResult};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The three flux-costed mutations a player can apply to an owned item.
/// Item identity (id, slot, base name, rarity) survives all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CraftOperation {
    Recalibrate,
    Reforge,
    Optimize,
}

impl CraftOperation {
    pub fn cost(&self) -> u64 {
        match self {
            CraftOperation::Recalibrate => RECALIBRATE_COST,
            CraftOperation::Reforge => REFORGE_COST,
            CraftOperation::Optimize => OPTIMIZE_COST,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CraftOperation::Recalibrate => "Recalibrate",
            CraftOperation::Reforge => "Reforge",
            CraftOperation::Optimize => "Optimize",
        }
    }
}

/// Apply one crafting operation in place. An `Err` leaves the item
/// untouched; the caller aborts the surrounding transaction.
pub fn apply_operation(
    item: &mut Item,
    operation: CraftOperation,
    owner_level: u32,
    rng: &mut impl Rng,
) -> EngineResult<()> {
    match operation {
        CraftOperation::Recalibrate => {
            recalibrate(item, rng);
            Ok(())
        }
        CraftOperation::Reforge => reforge(item, owner_level, rng),
        CraftOperation::Optimize => {
            optimize(item, owner_level, rng);
            Ok(())
        }
    }
}

/// Reroll every affix's value at its current tier. Names, tiers, and affix
/// count are untouched, so the item keeps its display name.
pub fn recalibrate(item: &mut Item, rng: &mut impl Rng) {
    for affix in &mut item.affixes {
        affix.value = roll_affix_value(affix.tier, rng);
    }
    item.recompute_stats();
}

/// Reroll affix count and identity under the item's rarity rules and
/// recompute the name. Uniques are template-bound and cannot be reforged.
pub fn reforge(item: &mut Item, owner_level: u32, rng: &mut impl Rng) -> EngineResult<()> {
    if item.rarity == Rarity::Unique {
        return Err(EngineError::FailedPrecondition(
            "unique items cannot be reforged".into(),
        ));
    }
    item.affixes = roll_affix_set(item.rarity, owner_level, rng);
    item.name = compose_name(&item.base_name, &item.affixes);
    item.recompute_stats();
    Ok(())
}

/// Reroll each affix's tier, keeping the better of the current and fresh
/// tier, then reroll the value at that tier keeping the better value.
/// Total power never goes down.
pub fn optimize(item: &mut Item, owner_level: u32, rng: &mut impl Rng) {
    let (lo, hi) = tier_band(item.rarity, owner_level);
    for affix in &mut item.affixes {
        let fresh_tier = rng.gen_range(lo..=hi);
        if fresh_tier > affix.tier {
            affix.tier = fresh_tier;
        }
        let rerolled = roll_affix_value(affix.tier, rng);
        affix.value = affix.value.max(rerolled);
    }
    item.recompute_stats();
}
