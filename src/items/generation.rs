use super::names::{base_names, AffixName, PREFIX_POOL, SUFFIX_POOL, UNIQUE_TEMPLATES};
use super::types::{Affix, AffixKind, Item, ItemSlot, Rarity, StatBlock};
use crate::core::constants::{
    AFFIX_VALUE_JITTER, AFFIX_VALUE_PER_TIER, MAX_ITEM_TIER, RARE_ROLL_THRESHOLD,
    UNCOMMON_ROLL_THRESHOLD, UNIQUE_ROLL_THRESHOLD,
};
use rand::Rng;
use uuid::Uuid;

/// Generate an item for a player at the given level, optionally forcing the
/// rarity (quest rewards do). Deterministic for a fixed random source.
pub fn generate_item(player_level: u32, forced_rarity: Option<Rarity>, rng: &mut impl Rng) -> Item {
    let rarity = forced_rarity.unwrap_or_else(|| roll_rarity(rng));
    let id = Uuid::from_u128(rng.gen());

    let (slot, base_name, unique_bonus) = if rarity == Rarity::Unique {
        let template = &UNIQUE_TEMPLATES[rng.gen_range(0..UNIQUE_TEMPLATES.len())];
        (
            template.slot,
            template.base_name.to_string(),
            Some(template.bonus),
        )
    } else {
        let slot = ItemSlot::all()[rng.gen_range(0..ItemSlot::all().len())];
        let names = base_names(slot);
        (slot, names[rng.gen_range(0..names.len())].to_string(), None)
    };

    let affixes = roll_affix_set(rarity, player_level, rng);
    let name = compose_name(&base_name, &affixes);

    let mut item = Item {
        id,
        rarity,
        slot,
        base_name,
        name,
        affixes,
        stats: StatBlock::new(),
        unique_bonus,
    };
    item.recompute_stats();
    item
}

pub fn roll_rarity(rng: &mut impl Rng) -> Rarity {
    let roll = rng.gen::<f64>();
    if roll > UNIQUE_ROLL_THRESHOLD {
        Rarity::Unique
    } else if roll > RARE_ROLL_THRESHOLD {
        Rarity::Rare
    } else if roll > UNCOMMON_ROLL_THRESHOLD {
        Rarity::Uncommon
    } else {
        Rarity::Common
    }
}

/// Highest tier reachable at a player level: one band per ten levels,
/// capped at tier 10.
pub fn max_tier_for_level(level: u32) -> u32 {
    (level / 10 + 1).min(MAX_ITEM_TIER)
}

/// Inclusive tier range a rarity rolls in, as a slice of the level's
/// maximum tier. Common sits in the bottom half, Uncommon in the 30-80%
/// band, Rare in the top half, Unique in the top fifth.
pub fn tier_band(rarity: Rarity, level: u32) -> (u32, u32) {
    let max = max_tier_for_level(level);
    let (lo_frac, hi_frac) = match rarity {
        Rarity::Common => (0.0, 0.5),
        Rarity::Uncommon => (0.3, 0.8),
        Rarity::Rare => (0.5, 1.0),
        Rarity::Unique => (0.8, 1.0),
    };
    let hi = ((max as f64 * hi_frac).ceil() as u32).clamp(1, max);
    let lo = ((max as f64 * lo_frac).floor() as u32 + 1).min(hi);
    (lo, hi)
}

pub fn roll_affix_value(tier: u32, rng: &mut impl Rng) -> i64 {
    (tier as i64 * AFFIX_VALUE_PER_TIER + rng.gen_range(0i64..=4) - AFFIX_VALUE_JITTER).max(1)
}

/// Roll the full affix set for a rarity. Shared between generation and
/// reforging so both obey the same count rules: Common gets a single affix
/// of either kind, Uncommon and Unique a prefix plus a suffix, Rare three
/// with the majority kind decided by a coin flip.
pub fn roll_affix_set(rarity: Rarity, level: u32, rng: &mut impl Rng) -> Vec<Affix> {
    let mut prefixes_used = Vec::new();
    let mut suffixes_used = Vec::new();
    let mut affixes = Vec::new();

    let kinds: &[AffixKind] = match rarity {
        Rarity::Common => {
            if rng.gen_bool(0.5) {
                &[AffixKind::Prefix]
            } else {
                &[AffixKind::Suffix]
            }
        }
        Rarity::Uncommon | Rarity::Unique => &[AffixKind::Prefix, AffixKind::Suffix],
        Rarity::Rare => {
            if rng.gen_bool(0.5) {
                &[AffixKind::Prefix, AffixKind::Prefix, AffixKind::Suffix]
            } else {
                &[AffixKind::Prefix, AffixKind::Suffix, AffixKind::Suffix]
            }
        }
    };

    for &kind in kinds {
        let (pool, used) = match kind {
            AffixKind::Prefix => (PREFIX_POOL, &mut prefixes_used),
            AffixKind::Suffix => (SUFFIX_POOL, &mut suffixes_used),
        };
        affixes.push(draw_affix(pool, used, kind, rarity, level, rng));
    }

    affixes
}

/// Draw one affix from a pool without repeating a name already used for
/// this kind on the item. Collisions probe forward so one roll suffices.
fn draw_affix(
    pool: &[AffixName],
    used: &mut Vec<usize>,
    kind: AffixKind,
    rarity: Rarity,
    level: u32,
    rng: &mut impl Rng,
) -> Affix {
    let mut index = rng.gen_range(0..pool.len());
    while used.contains(&index) {
        index = (index + 1) % pool.len();
    }
    used.push(index);

    let (lo, hi) = tier_band(rarity, level);
    let tier = rng.gen_range(lo..=hi);
    let value = roll_affix_value(tier, rng);

    Affix {
        name: pool[index].name.to_string(),
        kind,
        stat: pool[index].stat,
        value,
        tier,
    }
}

/// `[primary-prefix] base [primary-suffix]`, where the primary affix of a
/// kind is the one with the highest tier, earliest roll winning ties.
pub fn compose_name(base_name: &str, affixes: &[Affix]) -> String {
    let mut name = String::new();
    if let Some(prefix) = primary_affix(affixes, AffixKind::Prefix) {
        name.push_str(&prefix.name);
        name.push(' ');
    }
    name.push_str(base_name);
    if let Some(suffix) = primary_affix(affixes, AffixKind::Suffix) {
        name.push(' ');
        name.push_str(&suffix.name);
    }
    name
}

fn primary_affix(affixes: &[Affix], kind: AffixKind) -> Option<&Affix> {
    let mut best: Option<&Affix> = None;
    for affix in affixes.iter().filter(|a| a.kind == kind) {
        if best.map_or(true, |b| affix.tier > b.tier) {
            best = Some(affix);
        }
    }
    best
}
