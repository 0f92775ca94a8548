use crate::core::ids::{BossId, PlayerId, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Encounter-wide tweaks to how a correct answer converts into damage.
/// Applied in order: flat bonuses, then the critical roll, then mitigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossModifier {
    FlatDamageBonus { amount: u64 },
    CriticalChance { chance: f64 },
    DamageMitigation { fraction: f64 },
}

/// A shared boss record. HP only ever goes down while the encounter is
/// open; per-player progress lives on the player records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEncounter {
    pub id: BossId,
    pub title: String,
    pub max_hp: u64,
    pub current_hp: u64,
    pub damage_per_correct: u64,
    #[serde(default)]
    pub modifiers: Vec<BossModifier>,
    /// Reward multipliers for the best qualifying damage dealers, best
    /// first.
    pub reward_tiers: Vec<f64>,
    pub base_xp_reward: u64,
    pub base_currency_reward: u64,
    pub min_attempts: u32,
    pub min_corrects: u32,
    pub deadline: i64,
    pub is_active: bool,
    #[serde(default)]
    pub outcome: Option<BossOutcome>,
}

impl BossEncounter {
    pub fn defeated(&self) -> bool {
        self.current_hp == 0
    }
}

/// Per-player, per-boss accounting. Attempts count every non-duplicate
/// answer; everything else moves only on correct ones. The answered set is
/// the idempotency key for retried submissions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub attempts: u32,
    pub corrects: u32,
    pub critical_hits: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub damage_dealt: u64,
    pub damage_mitigated: u64,
    pub answered: HashSet<QuestionId>,
}

impl CombatStats {
    /// Both participation thresholds must be met to earn a reward tier.
    pub fn qualifies_for(&self, boss: &BossEncounter) -> bool {
        self.attempts >= boss.min_attempts && self.corrects >= boss.min_corrects
    }
}

/// One row of the final standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossRanking {
    pub player_id: PlayerId,
    pub damage_dealt: u64,
    pub qualified: bool,
    pub reward_multiplier: Option<f64>,
    pub xp_awarded: u64,
    pub currency_awarded: u64,
}

/// Recorded once at finalization; a repeat finalize returns this verbatim
/// instead of paying out again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossOutcome {
    pub finalized_at: i64,
    pub rankings: Vec<BossRanking>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss() -> BossEncounter {
        BossEncounter {
            id: "b1".to_string(),
            title: "The Deadline Wyrm".to_string(),
            max_hp: 1000,
            current_hp: 1000,
            damage_per_correct: 10,
            modifiers: Vec::new(),
            reward_tiers: vec![3.0, 2.0, 1.5],
            base_xp_reward: 100,
            base_currency_reward: 50,
            min_attempts: 5,
            min_corrects: 3,
            deadline: 10_000,
            is_active: true,
            outcome: None,
        }
    }

    #[test]
    fn test_defeated_at_zero_hp() {
        let mut b = boss();
        assert!(!b.defeated());
        b.current_hp = 0;
        assert!(b.defeated());
    }

    #[test]
    fn test_qualification_needs_both_thresholds() {
        let b = boss();
        let mut stats = CombatStats {
            attempts: 5,
            corrects: 3,
            ..CombatStats::default()
        };
        assert!(stats.qualifies_for(&b));

        stats.corrects = 2;
        assert!(!stats.qualifies_for(&b));

        stats.attempts = 4;
        stats.corrects = 4;
        assert!(!stats.qualifies_for(&b));
    }
}
