use super::types::{ItemSlot, Stat, UniqueBonus};

/// A named affix template: the display name plus the stat it feeds.
pub struct AffixName {
    pub name: &'static str,
    pub stat: Stat,
}

pub const PREFIX_POOL: &[AffixName] = &[
    AffixName {
        name: "Overclocked",
        stat: Stat::Tech,
    },
    AffixName {
        name: "Wired",
        stat: Stat::Tech,
    },
    AffixName {
        name: "Unblinking",
        stat: Stat::Focus,
    },
    AffixName {
        name: "Steadfast",
        stat: Stat::Focus,
    },
    AffixName {
        name: "Incisive",
        stat: Stat::Analysis,
    },
    AffixName {
        name: "Keen",
        stat: Stat::Analysis,
    },
    AffixName {
        name: "Magnetic",
        stat: Stat::Charisma,
    },
    AffixName {
        name: "Silver-Tongued",
        stat: Stat::Charisma,
    },
];

pub const SUFFIX_POOL: &[AffixName] = &[
    AffixName {
        name: "of the Compiler",
        stat: Stat::Tech,
    },
    AffixName {
        name: "of Circuitry",
        stat: Stat::Tech,
    },
    AffixName {
        name: "of Deep Study",
        stat: Stat::Focus,
    },
    AffixName {
        name: "of Vigilance",
        stat: Stat::Focus,
    },
    AffixName {
        name: "of Insight",
        stat: Stat::Analysis,
    },
    AffixName {
        name: "of the Scholar",
        stat: Stat::Analysis,
    },
    AffixName {
        name: "of Rhetoric",
        stat: Stat::Charisma,
    },
    AffixName {
        name: "of the Orator",
        stat: Stat::Charisma,
    },
];

pub fn base_names(slot: ItemSlot) -> &'static [&'static str] {
    match slot {
        ItemSlot::Head => &["Cap", "Hood", "Circlet", "Visor"],
        ItemSlot::Chest => &["Blazer", "Tunic", "Mantle", "Vest"],
        ItemSlot::Hands => &["Gloves", "Grips", "Wraps"],
        ItemSlot::Feet => &["Sneakers", "Boots", "Treads"],
        ItemSlot::Belt => &["Belt", "Sash", "Toolbelt"],
        ItemSlot::Amulet => &["Amulet", "Pendant", "Badge"],
        ItemSlot::Ring => &["Ring", "Band", "Signet"],
    }
}

/// A unique item template: fixed base name, slot, and stat bonus. The rolled
/// prefix and suffix still vary per drop.
pub struct UniqueTemplate {
    pub base_name: &'static str,
    pub slot: ItemSlot,
    pub bonus: UniqueBonus,
}

pub const UNIQUE_TEMPLATES: &[UniqueTemplate] = &[
    UniqueTemplate {
        base_name: "Valedictorian's Laurels",
        slot: ItemSlot::Head,
        bonus: UniqueBonus {
            stat: Stat::Analysis,
            value: 15,
        },
    },
    UniqueTemplate {
        base_name: "Archivist's Mantle",
        slot: ItemSlot::Chest,
        bonus: UniqueBonus {
            stat: Stat::Focus,
            value: 15,
        },
    },
    UniqueTemplate {
        base_name: "Debugger's Gauntlets",
        slot: ItemSlot::Hands,
        bonus: UniqueBonus {
            stat: Stat::Tech,
            value: 15,
        },
    },
    UniqueTemplate {
        base_name: "Courier's Winged Treads",
        slot: ItemSlot::Feet,
        bonus: UniqueBonus {
            stat: Stat::Focus,
            value: 12,
        },
    },
    UniqueTemplate {
        base_name: "Orator's Signet",
        slot: ItemSlot::Ring,
        bonus: UniqueBonus {
            stat: Stat::Charisma,
            value: 15,
        },
    },
];
