//! XP and currency accounting. Every other component's terminal effect
//! lands here as a ledger mutation.

use super::types::Player;
use crate::core::constants::LEVEL_UP_CURRENCY_BONUS;
use crate::core::ids::ClassId;
use crate::items::generation::generate_item;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpOutcome {
    pub new_xp: u64,
    pub new_level: u32,
    pub leveled_up: bool,
}

/// Apply an XP delta to a player. The delta is clamped so XP never goes
/// negative. When a class id is supplied the class-partitioned bucket moves
/// by the same delta. Crossing one or more level thresholds grants the flux
/// bonus and mints exactly one item into the resolved profile — one per
/// call, not one per level crossed.
pub fn apply_xp(
    player: &mut Player,
    class_id: Option<&ClassId>,
    delta: i64,
    rng: &mut impl Rng,
) -> XpOutcome {
    let old_level = player.level();
    player.xp = add_clamped(player.xp, delta);
    if let Some(class_id) = class_id {
        let bucket = player.class_xp.entry(class_id.clone()).or_insert(0);
        *bucket = add_clamped(*bucket, delta);
    }

    let new_level = player.level();
    let leveled_up = new_level > old_level;
    if leveled_up {
        player.currency += LEVEL_UP_CURRENCY_BONUS;
        let item = generate_item(new_level, None, rng);
        player.resolve_profile_mut(class_id).inventory.push(item);
    }

    XpOutcome {
        new_xp: player.xp,
        new_level,
        leveled_up,
    }
}

fn add_clamped(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}
