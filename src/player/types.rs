use crate::boss::types::CombatStats;
use crate::core::constants::{BASE_STAT_VALUE, XP_PER_LEVEL};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::{BossId, ClassId, PlayerId, QuestId, SectionId};
use crate::engagement::types::EngagementLog;
use crate::items::equipment::{EquipSlot, Equipment};
use crate::items::types::{Item, Stat, StatBlock};
use crate::quests::types::QuestProgress;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// One inventory plus worn equipment. Players have a legacy global profile
/// and optionally one profile per class.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Profile {
    pub inventory: Vec<Item>,
    pub equipped: Equipment,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look an owned item up by id, worn or carried.
    pub fn find_item(&self, item_id: &Uuid) -> Option<&Item> {
        self.inventory
            .iter()
            .find(|item| &item.id == item_id)
            .or_else(|| self.equipped.iter_equipped().find(|item| &item.id == item_id))
    }

    pub fn find_item_mut(&mut self, item_id: &Uuid) -> Option<&mut Item> {
        if let Some(index) = self.inventory.iter().position(|item| &item.id == item_id) {
            return self.inventory.get_mut(index);
        }
        self.equipped
            .iter_equipped_mut()
            .find(|item| &item.id == item_id)
    }

    /// Move an item from inventory into its equipment position, swapping any
    /// displaced item back into the inventory.
    pub fn equip(&mut self, item_id: &Uuid) -> EngineResult<EquipSlot> {
        let index = self
            .inventory
            .iter()
            .position(|item| &item.id == item_id)
            .ok_or_else(|| EngineError::not_found("item", item_id.to_string()))?;
        let item = self.inventory.remove(index);
        let slot = self.equipped.target_slot(item.slot);
        if let Some(displaced) = self.equipped.set(slot, Some(item)) {
            self.inventory.push(displaced);
        }
        Ok(slot)
    }

    /// Destroy a carried item, returning the flux it salvages into. Worn
    /// items must be unequipped first.
    pub fn disenchant(&mut self, item_id: &Uuid) -> EngineResult<u64> {
        if let Some(index) = self.inventory.iter().position(|item| &item.id == item_id) {
            let item = self.inventory.remove(index);
            return Ok(item.rarity.disenchant_value());
        }
        if self
            .equipped
            .iter_equipped()
            .any(|item| &item.id == item_id)
        {
            return Err(EngineError::FailedPrecondition(
                "item is equipped, unequip it before disenchanting".into(),
            ));
        }
        Err(EngineError::not_found("item", item_id.to_string()))
    }
}

/// One record per student. The record is the unit of optimistic commit:
/// everything a player-scoped operation touches lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub xp: u64,
    pub currency: u64,
    #[serde(default)]
    pub class_xp: HashMap<ClassId, u64>,
    #[serde(default)]
    pub sections: Vec<SectionId>,
    pub profile: Profile,
    #[serde(default)]
    pub class_profiles: HashMap<ClassId, Profile>,
    #[serde(default)]
    pub active_quests: Vec<QuestProgress>,
    #[serde(default)]
    pub completed_quest_ids: HashSet<QuestId>,
    #[serde(default)]
    pub combat: HashMap<BossId, CombatStats>,
    #[serde(default)]
    pub engagement: EngagementLog,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            xp: 0,
            currency: 0,
            class_xp: HashMap::new(),
            sections: Vec::new(),
            profile: Profile::new(),
            class_profiles: HashMap::new(),
            active_quests: Vec::new(),
            completed_quest_ids: HashSet::new(),
            combat: HashMap::new(),
            engagement: EngagementLog::default(),
        }
    }

    /// Level is always derived from XP, never stored.
    pub fn level(&self) -> u32 {
        (self.xp / XP_PER_LEVEL) as u32 + 1
    }

    /// The class-scoped profile when a class id is supplied and the record
    /// has one, otherwise the legacy global profile. Call sites never branch
    /// on the duality themselves.
    pub fn resolve_profile(&self, class_id: Option<&ClassId>) -> &Profile {
        match class_id {
            Some(class_id) => self.class_profiles.get(class_id).unwrap_or(&self.profile),
            None => &self.profile,
        }
    }

    /// Mutable variant; creates the class profile on first class-scoped
    /// write.
    pub fn resolve_profile_mut(&mut self, class_id: Option<&ClassId>) -> &mut Profile {
        match class_id {
            Some(class_id) => self
                .class_profiles
                .entry(class_id.clone())
                .or_insert_with(Profile::new),
            None => &mut self.profile,
        }
    }

    /// Quest-gating stats: a base of 10 in each stat plus everything the
    /// resolved profile has equipped.
    pub fn derived_stats(&self, class_id: Option<&ClassId>) -> StatBlock {
        let mut stats = StatBlock {
            tech: BASE_STAT_VALUE,
            focus: BASE_STAT_VALUE,
            analysis: BASE_STAT_VALUE,
            charisma: BASE_STAT_VALUE,
        };
        let worn = self.resolve_profile(class_id).equipped.stat_totals();
        for stat in Stat::all() {
            stats.add(stat, worn.get(stat));
        }
        stats
    }

    pub fn quest_progress(&self, quest_id: &QuestId) -> Option<&QuestProgress> {
        self.active_quests
            .iter()
            .find(|progress| &progress.quest_id == quest_id)
    }

    pub fn quest_progress_mut(&mut self, quest_id: &QuestId) -> Option<&mut QuestProgress> {
        self.active_quests
            .iter_mut()
            .find(|progress| &progress.quest_id == quest_id)
    }

    pub fn remove_quest_progress(&mut self, quest_id: &QuestId) -> Option<QuestProgress> {
        let index = self
            .active_quests
            .iter()
            .position(|progress| &progress.quest_id == quest_id)?;
        Some(self.active_quests.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::generation::generate_item;
    use crate::items::types::{ItemSlot, Rarity};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    #[test]
    fn test_level_is_pure_function_of_xp() {
        let mut player = Player::new("s1");
        assert_eq!(player.level(), 1);
        player.xp = 999;
        assert_eq!(player.level(), 1);
        player.xp = 1000;
        assert_eq!(player.level(), 2);
        player.xp = 12_345;
        assert_eq!(player.level(), 13);
    }

    #[test]
    fn test_resolve_profile_falls_back_to_global() {
        let mut player = Player::new("s1");
        let class = "math".to_string();
        player.profile.inventory.push(generate_item(10, None, &mut rng(1)));

        // No class profile yet: class-scoped reads see the global profile.
        assert_eq!(player.resolve_profile(Some(&class)).inventory.len(), 1);

        // First class-scoped write creates the class profile.
        player
            .resolve_profile_mut(Some(&class))
            .inventory
            .push(generate_item(10, None, &mut rng(2)));
        assert_eq!(player.resolve_profile(Some(&class)).inventory.len(), 1);
        assert_eq!(player.resolve_profile(None).inventory.len(), 1);
    }

    #[test]
    fn test_equip_moves_item_out_of_inventory() {
        let mut player = Player::new("s1");
        let item = generate_item(30, Some(Rarity::Rare), &mut rng(3));
        let item_id = item.id;
        player.profile.inventory.push(item);

        let slot = player.profile.equip(&item_id).unwrap();
        assert!(player.profile.equipped.get(slot).is_some());
        assert!(player.profile.inventory.is_empty());
    }

    #[test]
    fn test_equip_swaps_displaced_item_back() {
        let mut player = Player::new("s1");
        let mut rng = rng(4);
        // Two items colliding on the same non-ring position.
        let first = loop {
            let item = generate_item(30, Some(Rarity::Rare), &mut rng);
            if item.slot != ItemSlot::Ring {
                break item;
            }
        };
        let second = loop {
            let item = generate_item(30, Some(Rarity::Rare), &mut rng);
            if item.slot == first.slot {
                break item;
            }
        };
        let (first_id, second_id) = (first.id, second.id);
        player.profile.inventory.push(first);
        player.profile.inventory.push(second);

        player.profile.equip(&first_id).unwrap();
        player.profile.equip(&second_id).unwrap();
        assert_eq!(player.profile.inventory.len(), 1);
        assert_eq!(player.profile.inventory[0].id, first_id);
    }

    #[test]
    fn test_equip_missing_item_is_not_found() {
        let mut player = Player::new("s1");
        let err = player.profile.equip(&Uuid::nil()).unwrap_err();
        assert_eq!(err.kind(), "NOT_FOUND");
    }

    #[test]
    fn test_disenchant_rejects_worn_item() {
        let mut player = Player::new("s1");
        let item = generate_item(30, Some(Rarity::Common), &mut rng(5));
        let item_id = item.id;
        player.profile.inventory.push(item);
        player.profile.equip(&item_id).unwrap();

        let err = player.profile.disenchant(&item_id).unwrap_err();
        assert_eq!(err.kind(), "FAILED_PRECONDITION");
    }

    #[test]
    fn test_disenchant_pays_by_rarity() {
        let mut player = Player::new("s1");
        let item = generate_item(30, Some(Rarity::Rare), &mut rng(6));
        let item_id = item.id;
        player.profile.inventory.push(item);

        let flux = player.profile.disenchant(&item_id).unwrap();
        assert_eq!(flux, Rarity::Rare.disenchant_value());
        assert!(player.profile.inventory.is_empty());
    }

    #[test]
    fn test_derived_stats_base_ten_plus_equipment() {
        let mut player = Player::new("s1");
        let stats = player.derived_stats(None);
        assert_eq!(stats.tech, 10);
        assert_eq!(stats.total(), 40);

        let item = generate_item(90, Some(Rarity::Rare), &mut rng(7));
        let worn_total = item.stats.total();
        let item_id = item.id;
        player.profile.inventory.push(item);
        player.profile.equip(&item_id).unwrap();

        assert_eq!(player.derived_stats(None).total(), 40 + worn_total);
    }
}
