use crate::core::constants::{
    DISENCHANT_VALUE_COMMON, DISENCHANT_VALUE_RARE, DISENCHANT_VALUE_UNCOMMON,
    DISENCHANT_VALUE_UNIQUE,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common = 0,
    Uncommon = 1,
    Rare = 2,
    Unique = 3,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Unique => "Unique",
        }
    }

    /// Flux gained when the item is disenchanted.
    pub fn disenchant_value(&self) -> u64 {
        match self {
            Rarity::Common => DISENCHANT_VALUE_COMMON,
            Rarity::Uncommon => DISENCHANT_VALUE_UNCOMMON,
            Rarity::Rare => DISENCHANT_VALUE_RARE,
            Rarity::Unique => DISENCHANT_VALUE_UNIQUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSlot {
    Head,
    Chest,
    Hands,
    Feet,
    Belt,
    Amulet,
    Ring,
}

impl ItemSlot {
    pub fn all() -> [ItemSlot; 7] {
        [
            ItemSlot::Head,
            ItemSlot::Chest,
            ItemSlot::Hands,
            ItemSlot::Feet,
            ItemSlot::Belt,
            ItemSlot::Amulet,
            ItemSlot::Ring,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ItemSlot::Head => "Head",
            ItemSlot::Chest => "Chest",
            ItemSlot::Hands => "Hands",
            ItemSlot::Feet => "Feet",
            ItemSlot::Belt => "Belt",
            ItemSlot::Amulet => "Amulet",
            ItemSlot::Ring => "Ring",
        }
    }
}

/// The four stats quests gate on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Tech,
    Focus,
    Analysis,
    Charisma,
}

impl Stat {
    pub fn all() -> [Stat; 4] {
        [Stat::Tech, Stat::Focus, Stat::Analysis, Stat::Charisma]
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Stat::Tech => "TEC",
            Stat::Focus => "FOC",
            Stat::Analysis => "ANA",
            Stat::Charisma => "CHA",
        }
    }
}

/// One value per stat. Doubles as a requirement set, where zero means
/// "no requirement".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBlock {
    pub tech: i64,
    pub focus: i64,
    pub analysis: i64,
    pub charisma: i64,
}

impl StatBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stat: Stat) -> i64 {
        match stat {
            Stat::Tech => self.tech,
            Stat::Focus => self.focus,
            Stat::Analysis => self.analysis,
            Stat::Charisma => self.charisma,
        }
    }

    pub fn add(&mut self, stat: Stat, value: i64) {
        match stat {
            Stat::Tech => self.tech += value,
            Stat::Focus => self.focus += value,
            Stat::Analysis => self.analysis += value,
            Stat::Charisma => self.charisma += value,
        }
    }

    pub fn total(&self) -> i64 {
        self.tech + self.focus + self.analysis + self.charisma
    }

    /// Whether every stat meets the corresponding minimum.
    pub fn meets(&self, requirements: &StatBlock) -> bool {
        Stat::all()
            .iter()
            .all(|&stat| self.get(stat) >= requirements.get(stat))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AffixKind {
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Affix {
    pub name: String,
    pub kind: AffixKind,
    pub stat: Stat,
    pub value: i64,
    pub tier: u32,
}

/// Fixed stat bonus carried by a unique item's template, independent of its
/// rolled affixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueBonus {
    pub stat: Stat,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub rarity: Rarity,
    pub slot: ItemSlot,
    pub base_name: String,
    pub name: String,
    pub affixes: Vec<Affix>,
    pub stats: StatBlock,
    #[serde(default)]
    pub unique_bonus: Option<UniqueBonus>,
}

impl Item {
    /// Rebuilds `stats` from the affix list plus the unique template bonus.
    /// Called after every crafting mutation so the totals never drift.
    pub fn recompute_stats(&mut self) {
        let mut stats = StatBlock::new();
        for affix in &self.affixes {
            stats.add(affix.stat, affix.value);
        }
        if let Some(bonus) = self.unique_bonus {
            stats.add(bonus.stat, bonus.value);
        }
        self.stats = stats;
    }
}
