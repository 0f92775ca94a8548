//! Answer-driven boss damage and the tiered reward ranking.

use super::types::{BossEncounter, BossModifier, BossOutcome, BossRanking, CombatStats};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::{PlayerId, QuestionId};
use crate::player::types::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    /// False for wrong answers and for duplicates of an already-scored
    /// question.
    pub awarded: bool,
    pub damage_dealt: u64,
    pub new_boss_hp: u64,
    pub defeated: bool,
}

/// Score one answer against an open encounter. A repeated question id is a
/// benign no-op; a wrong answer still counts an attempt and breaks the
/// streak.
pub fn submit_answer(
    player: &mut Player,
    boss: &mut BossEncounter,
    question_id: &QuestionId,
    correct: bool,
    now: i64,
    rng: &mut impl Rng,
) -> EngineResult<AnswerOutcome> {
    if !boss.is_active || boss.outcome.is_some() {
        return Err(EngineError::FailedPrecondition(
            "encounter is closed".into(),
        ));
    }
    if boss.defeated() {
        return Err(EngineError::FailedPrecondition(
            "boss is already defeated".into(),
        ));
    }
    if now >= boss.deadline {
        return Err(EngineError::FailedPrecondition(
            "encounter deadline has passed".into(),
        ));
    }

    let stats = player.combat.entry(boss.id.clone()).or_default();
    if stats.answered.contains(question_id) {
        return Ok(AnswerOutcome {
            awarded: false,
            damage_dealt: 0,
            new_boss_hp: boss.current_hp,
            defeated: false,
        });
    }
    stats.answered.insert(question_id.clone());
    stats.attempts += 1;

    if !correct {
        stats.current_streak = 0;
        return Ok(AnswerOutcome {
            awarded: false,
            damage_dealt: 0,
            new_boss_hp: boss.current_hp,
            defeated: false,
        });
    }

    stats.corrects += 1;
    stats.current_streak += 1;
    stats.longest_streak = stats.longest_streak.max(stats.current_streak);

    let roll = resolve_damage(boss, rng);
    if roll.critical {
        stats.critical_hits += 1;
    }
    let dealt = roll.dealt.min(boss.current_hp);
    boss.current_hp -= dealt;
    stats.damage_dealt += dealt;
    stats.damage_mitigated += roll.mitigated;

    Ok(AnswerOutcome {
        awarded: true,
        damage_dealt: dealt,
        new_boss_hp: boss.current_hp,
        defeated: boss.defeated(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub dealt: u64,
    pub mitigated: u64,
    pub critical: bool,
}

/// Damage for one correct answer: flat bonuses first, then one critical
/// doubling, then mitigation. Not yet clamped to remaining HP.
pub fn resolve_damage(boss: &BossEncounter, rng: &mut impl Rng) -> DamageRoll {
    let mut damage = boss.damage_per_correct;
    for modifier in &boss.modifiers {
        if let BossModifier::FlatDamageBonus { amount } = modifier {
            damage += amount;
        }
    }

    let mut critical = false;
    for modifier in &boss.modifiers {
        if let BossModifier::CriticalChance { chance } = modifier {
            if !critical && rng.gen::<f64>() < *chance {
                critical = true;
            }
        }
    }
    if critical {
        damage *= 2;
    }

    let mut mitigated = 0;
    for modifier in &boss.modifiers {
        if let BossModifier::DamageMitigation { fraction } = modifier {
            let cut = (damage as f64 * fraction.clamp(0.0, 1.0)).round() as u64;
            let cut = cut.min(damage);
            damage -= cut;
            mitigated += cut;
        }
    }

    DamageRoll {
        dealt: damage,
        mitigated,
        critical,
    }
}

/// Final standings: everyone who answered, ordered by damage dealt (ties
/// broken by player id for a stable result). Reward tiers go to qualifying
/// players in ranking order; qualifiers past the tier list and everyone
/// under the thresholds get nothing.
pub fn rank_participants(
    boss: &BossEncounter,
    participants: &[(PlayerId, CombatStats)],
    finalized_at: i64,
) -> BossOutcome {
    let mut entries: Vec<&(PlayerId, CombatStats)> = participants.iter().collect();
    entries.sort_by(|a, b| {
        b.1.damage_dealt
            .cmp(&a.1.damage_dealt)
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut rankings = Vec::with_capacity(entries.len());
    let mut qualified_rank = 0usize;
    for (player_id, stats) in entries {
        let qualified = stats.qualifies_for(boss);
        let reward_multiplier = if qualified {
            let multiplier = boss.reward_tiers.get(qualified_rank).copied();
            qualified_rank += 1;
            multiplier
        } else {
            None
        };
        let xp_awarded = reward_multiplier
            .map_or(0, |m| (boss.base_xp_reward as f64 * m).round() as u64);
        let currency_awarded = reward_multiplier
            .map_or(0, |m| (boss.base_currency_reward as f64 * m).round() as u64);

        rankings.push(BossRanking {
            player_id: player_id.clone(),
            damage_dealt: stats.damage_dealt,
            qualified,
            reward_multiplier,
            xp_awarded,
            currency_awarded,
        });
    }

    BossOutcome {
        finalized_at,
        rankings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng(seed: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed)
    }

    fn boss() -> BossEncounter {
        BossEncounter {
            id: "b1".to_string(),
            title: "The Deadline Wyrm".to_string(),
            max_hp: 100,
            current_hp: 100,
            damage_per_correct: 10,
            modifiers: Vec::new(),
            reward_tiers: vec![3.0, 2.0],
            base_xp_reward: 100,
            base_currency_reward: 50,
            min_attempts: 2,
            min_corrects: 1,
            deadline: 10_000,
            is_active: true,
            outcome: None,
        }
    }

    #[test]
    fn test_correct_answer_deals_damage_and_tracks_stats() {
        let mut player = Player::new("s1");
        let mut b = boss();
        let outcome =
            submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng(1)).unwrap();

        assert!(outcome.awarded);
        assert_eq!(outcome.damage_dealt, 10);
        assert_eq!(outcome.new_boss_hp, 90);
        assert!(!outcome.defeated);

        let stats = &player.combat["b1"];
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.corrects, 1);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.damage_dealt, 10);
    }

    #[test]
    fn test_wrong_answer_counts_attempt_and_breaks_streak() {
        let mut player = Player::new("s1");
        let mut b = boss();
        let mut rng = rng(2);
        submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng).unwrap();
        submit_answer(&mut player, &mut b, &"q2".to_string(), true, 100, &mut rng).unwrap();
        let outcome =
            submit_answer(&mut player, &mut b, &"q3".to_string(), false, 100, &mut rng).unwrap();

        assert!(!outcome.awarded);
        assert_eq!(b.current_hp, 80);
        let stats = &player.combat["b1"];
        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.corrects, 2);
        assert_eq!(stats.current_streak, 0);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn test_duplicate_question_is_benign_noop() {
        let mut player = Player::new("s1");
        let mut b = boss();
        let mut rng = rng(3);
        submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng).unwrap();
        let duplicate =
            submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng).unwrap();

        assert!(!duplicate.awarded);
        assert_eq!(duplicate.damage_dealt, 0);
        assert_eq!(b.current_hp, 90);
        let stats = &player.combat["b1"];
        assert_eq!(stats.attempts, 1);
        assert_eq!(stats.corrects, 1);
    }

    #[test]
    fn test_damage_clamps_at_zero_and_marks_defeat() {
        let mut player = Player::new("s1");
        let mut b = boss();
        b.current_hp = 7;
        let outcome =
            submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng(4)).unwrap();

        assert_eq!(outcome.damage_dealt, 7);
        assert_eq!(outcome.new_boss_hp, 0);
        assert!(outcome.defeated);
        assert_eq!(player.combat["b1"].damage_dealt, 7);
    }

    #[test]
    fn test_defeated_boss_rejects_answers() {
        let mut player = Player::new("s1");
        let mut b = boss();
        b.current_hp = 0;
        let err = submit_answer(&mut player, &mut b, &"q1".to_string(), true, 100, &mut rng(5))
            .unwrap_err();
        assert_eq!(err.kind(), "FAILED_PRECONDITION");
    }

    #[test]
    fn test_past_deadline_rejects_answers() {
        let mut player = Player::new("s1");
        let mut b = boss();
        let err = submit_answer(
            &mut player,
            &mut b,
            &"q1".to_string(),
            true,
            10_000,
            &mut rng(6),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "FAILED_PRECONDITION");
        assert!(player.combat.get("b1").map_or(true, |s| s.attempts == 0));
    }

    #[test]
    fn test_flat_bonus_modifier() {
        let mut b = boss();
        b.modifiers = vec![BossModifier::FlatDamageBonus { amount: 5 }];
        let roll = resolve_damage(&b, &mut rng(7));
        assert_eq!(roll.dealt, 15);
        assert!(!roll.critical);
    }

    #[test]
    fn test_guaranteed_critical_doubles_damage() {
        let mut b = boss();
        b.modifiers = vec![BossModifier::CriticalChance { chance: 1.0 }];
        let roll = resolve_damage(&b, &mut rng(8));
        assert!(roll.critical);
        assert_eq!(roll.dealt, 20);
    }

    #[test]
    fn test_mitigation_cuts_and_records() {
        let mut b = boss();
        b.modifiers = vec![BossModifier::DamageMitigation { fraction: 0.5 }];
        let roll = resolve_damage(&b, &mut rng(9));
        assert_eq!(roll.dealt, 5);
        assert_eq!(roll.mitigated, 5);
    }

    #[test]
    fn test_modifier_stacking_order() {
        let mut b = boss();
        b.modifiers = vec![
            BossModifier::FlatDamageBonus { amount: 10 },
            BossModifier::CriticalChance { chance: 1.0 },
            BossModifier::DamageMitigation { fraction: 0.25 },
        ];
        // (10 + 10) * 2 = 40, minus 25% mitigation = 30.
        let roll = resolve_damage(&b, &mut rng(10));
        assert!(roll.critical);
        assert_eq!(roll.dealt, 30);
        assert_eq!(roll.mitigated, 10);
    }

    #[test]
    fn test_ranking_orders_by_damage_and_gates_on_thresholds() {
        let b = boss();
        let strong = CombatStats {
            attempts: 5,
            corrects: 5,
            damage_dealt: 50,
            ..CombatStats::default()
        };
        let mid = CombatStats {
            attempts: 3,
            corrects: 3,
            damage_dealt: 30,
            ..CombatStats::default()
        };
        // Tops the damage chart but under the attempt threshold.
        let grinder = CombatStats {
            attempts: 1,
            corrects: 1,
            damage_dealt: 60,
            ..CombatStats::default()
        };
        let participants = vec![
            ("s1".to_string(), strong),
            ("s2".to_string(), mid),
            ("s3".to_string(), grinder),
        ];

        let outcome = rank_participants(&b, &participants, 9999);
        assert_eq!(outcome.finalized_at, 9999);
        assert_eq!(outcome.rankings.len(), 3);

        // s3 leads the standings but does not qualify.
        assert_eq!(outcome.rankings[0].player_id, "s3");
        assert!(!outcome.rankings[0].qualified);
        assert_eq!(outcome.rankings[0].reward_multiplier, None);
        assert_eq!(outcome.rankings[0].xp_awarded, 0);

        // Tiers go to qualifying players in damage order.
        assert_eq!(outcome.rankings[1].player_id, "s1");
        assert_eq!(outcome.rankings[1].reward_multiplier, Some(3.0));
        assert_eq!(outcome.rankings[1].xp_awarded, 300);
        assert_eq!(outcome.rankings[1].currency_awarded, 150);

        assert_eq!(outcome.rankings[2].player_id, "s2");
        assert_eq!(outcome.rankings[2].reward_multiplier, Some(2.0));
    }

    #[test]
    fn test_qualifiers_past_tier_list_get_nothing() {
        let mut b = boss();
        b.reward_tiers = vec![2.0];
        let stats = |damage: u64| CombatStats {
            attempts: 2,
            corrects: 2,
            damage_dealt: damage,
            ..CombatStats::default()
        };
        let participants = vec![
            ("s1".to_string(), stats(30)),
            ("s2".to_string(), stats(20)),
        ];

        let outcome = rank_participants(&b, &participants, 0);
        assert_eq!(outcome.rankings[0].reward_multiplier, Some(2.0));
        assert!(outcome.rankings[1].qualified);
        assert_eq!(outcome.rankings[1].reward_multiplier, None);
        assert_eq!(outcome.rankings[1].xp_awarded, 0);
    }

    #[test]
    fn test_ranking_tie_breaks_by_player_id() {
        let b = boss();
        let stats = || CombatStats {
            attempts: 2,
            corrects: 2,
            damage_dealt: 40,
            ..CombatStats::default()
        };
        let participants = vec![("zz".to_string(), stats()), ("aa".to_string(), stats())];
        let outcome = rank_participants(&b, &participants, 0);
        assert_eq!(outcome.rankings[0].player_id, "aa");
        assert_eq!(outcome.rankings[1].player_id, "zz");
    }
}
