use super::types::{Item, ItemSlot, Stat, StatBlock};
use serde::{Deserialize, Serialize};

/// A concrete equipment position. Items with `ItemSlot::Ring` can sit in
/// either of the two ring positions; every other item slot maps one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipSlot {
    Head,
    Chest,
    Hands,
    Feet,
    Belt,
    Amulet,
    RingLeft,
    RingRight,
}

impl EquipSlot {
    pub fn all() -> [EquipSlot; 8] {
        [
            EquipSlot::Head,
            EquipSlot::Chest,
            EquipSlot::Hands,
            EquipSlot::Feet,
            EquipSlot::Belt,
            EquipSlot::Amulet,
            EquipSlot::RingLeft,
            EquipSlot::RingRight,
        ]
    }
}

/// Worn items, one per position.
///
/// IMPORTANT: new positions must use `#[serde(default)]` so records saved
/// before the field existed still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub head: Option<Item>,
    pub chest: Option<Item>,
    pub hands: Option<Item>,
    pub feet: Option<Item>,
    pub belt: Option<Item>,
    pub amulet: Option<Item>,
    #[serde(default)]
    pub ring_left: Option<Item>,
    #[serde(default)]
    pub ring_right: Option<Item>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            head: None,
            chest: None,
            hands: None,
            feet: None,
            belt: None,
            amulet: None,
            ring_left: None,
            ring_right: None,
        }
    }

    pub fn get(&self, slot: EquipSlot) -> &Option<Item> {
        match slot {
            EquipSlot::Head => &self.head,
            EquipSlot::Chest => &self.chest,
            EquipSlot::Hands => &self.hands,
            EquipSlot::Feet => &self.feet,
            EquipSlot::Belt => &self.belt,
            EquipSlot::Amulet => &self.amulet,
            EquipSlot::RingLeft => &self.ring_left,
            EquipSlot::RingRight => &self.ring_right,
        }
    }

    /// Place an item (or nothing) into a position, returning whatever was
    /// displaced.
    pub fn set(&mut self, slot: EquipSlot, item: Option<Item>) -> Option<Item> {
        let position = match slot {
            EquipSlot::Head => &mut self.head,
            EquipSlot::Chest => &mut self.chest,
            EquipSlot::Hands => &mut self.hands,
            EquipSlot::Feet => &mut self.feet,
            EquipSlot::Belt => &mut self.belt,
            EquipSlot::Amulet => &mut self.amulet,
            EquipSlot::RingLeft => &mut self.ring_left,
            EquipSlot::RingRight => &mut self.ring_right,
        };
        std::mem::replace(position, item)
    }

    /// Where an item of the given slot should go. Rings fill the empty
    /// position first and displace the left ring when both are taken.
    pub fn target_slot(&self, slot: ItemSlot) -> EquipSlot {
        match slot {
            ItemSlot::Head => EquipSlot::Head,
            ItemSlot::Chest => EquipSlot::Chest,
            ItemSlot::Hands => EquipSlot::Hands,
            ItemSlot::Feet => EquipSlot::Feet,
            ItemSlot::Belt => EquipSlot::Belt,
            ItemSlot::Amulet => EquipSlot::Amulet,
            ItemSlot::Ring => {
                if self.ring_left.is_none() || self.ring_right.is_some() {
                    EquipSlot::RingLeft
                } else {
                    EquipSlot::RingRight
                }
            }
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &Item> {
        [
            &self.head,
            &self.chest,
            &self.hands,
            &self.feet,
            &self.belt,
            &self.amulet,
            &self.ring_left,
            &self.ring_right,
        ]
        .into_iter()
        .filter_map(|item| item.as_ref())
    }

    pub fn iter_equipped_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        [
            &mut self.head,
            &mut self.chest,
            &mut self.hands,
            &mut self.feet,
            &mut self.belt,
            &mut self.amulet,
            &mut self.ring_left,
            &mut self.ring_right,
        ]
        .into_iter()
        .filter_map(|item| item.as_mut())
    }

    /// Combined stat contribution of everything worn.
    pub fn stat_totals(&self) -> StatBlock {
        let mut totals = StatBlock::new();
        for item in self.iter_equipped() {
            for stat in Stat::all() {
                totals.add(stat, item.stats.get(stat));
            }
        }
        totals
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::{Rarity, StatBlock};
    use super::*;
    use uuid::Uuid;

    fn test_item(slot: ItemSlot, tech: i64) -> Item {
        Item {
            id: Uuid::from_u128(tech as u128 + 1),
            rarity: Rarity::Common,
            slot,
            base_name: "Test".to_string(),
            name: "Test".to_string(),
            affixes: vec![],
            stats: StatBlock {
                tech,
                ..StatBlock::new()
            },
            unique_bonus: None,
        }
    }

    #[test]
    fn test_equipment_starts_empty() {
        let eq = Equipment::new();
        assert_eq!(eq.iter_equipped().count(), 0);
        for slot in EquipSlot::all() {
            assert!(eq.get(slot).is_none());
        }
    }

    #[test]
    fn test_set_returns_displaced_item() {
        let mut eq = Equipment::new();
        let old = test_item(ItemSlot::Head, 1);
        let new = test_item(ItemSlot::Head, 2);

        assert!(eq.set(EquipSlot::Head, Some(old.clone())).is_none());
        let displaced = eq.set(EquipSlot::Head, Some(new)).unwrap();
        assert_eq!(displaced, old);
        assert_eq!(eq.iter_equipped().count(), 1);
    }

    #[test]
    fn test_rings_fill_empty_position_first() {
        let mut eq = Equipment::new();
        assert_eq!(eq.target_slot(ItemSlot::Ring), EquipSlot::RingLeft);

        eq.set(EquipSlot::RingLeft, Some(test_item(ItemSlot::Ring, 1)));
        assert_eq!(eq.target_slot(ItemSlot::Ring), EquipSlot::RingRight);

        eq.set(EquipSlot::RingRight, Some(test_item(ItemSlot::Ring, 2)));
        // Both taken: displace the left ring.
        assert_eq!(eq.target_slot(ItemSlot::Ring), EquipSlot::RingLeft);
    }

    #[test]
    fn test_non_ring_slots_map_directly() {
        let eq = Equipment::new();
        assert_eq!(eq.target_slot(ItemSlot::Head), EquipSlot::Head);
        assert_eq!(eq.target_slot(ItemSlot::Chest), EquipSlot::Chest);
        assert_eq!(eq.target_slot(ItemSlot::Amulet), EquipSlot::Amulet);
    }

    #[test]
    fn test_stat_totals_sum_worn_items() {
        let mut eq = Equipment::new();
        eq.set(EquipSlot::Head, Some(test_item(ItemSlot::Head, 5)));
        eq.set(EquipSlot::RingLeft, Some(test_item(ItemSlot::Ring, 3)));
        eq.set(EquipSlot::RingRight, Some(test_item(ItemSlot::Ring, 2)));

        let totals = eq.stat_totals();
        assert_eq!(totals.tech, 10);
        assert_eq!(totals.total(), 10);
    }
}
