//! Quest flow: accept, deploy against derived stats, resolve, and the
//! salvation die.

use super::types::{Quest, QuestProgress, QuestState};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::ClassId;
use crate::items::generation::generate_item;
use crate::items::types::StatBlock;
use crate::player::ledger::{apply_xp, XpOutcome};
use crate::player::types::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Take a quest on. Rejects anything that would let a player farm the same
/// reward twice or start a quest not meant for them.
pub fn accept(
    player: &mut Player,
    quest: &Quest,
    class_id: Option<&ClassId>,
    now: i64,
) -> EngineResult<()> {
    if !quest.is_open_at(now) {
        return Err(EngineError::FailedPrecondition("quest is not open".into()));
    }
    if let Some(target) = &quest.target_class {
        if class_id != Some(target) {
            return Err(EngineError::FailedPrecondition(
                "quest is not available for this class".into(),
            ));
        }
    }
    if !quest.target_sections.is_empty()
        && !quest
            .target_sections
            .iter()
            .any(|section| player.sections.contains(section))
    {
        return Err(EngineError::FailedPrecondition(
            "quest is not available for this section".into(),
        ));
    }
    if player.completed_quest_ids.contains(&quest.id) {
        return Err(EngineError::FailedPrecondition(
            "quest is already completed".into(),
        ));
    }
    if player.quest_progress(&quest.id).is_some() {
        return Err(EngineError::FailedPrecondition(
            "quest is already accepted".into(),
        ));
    }

    player
        .active_quests
        .push(QuestProgress::new(quest.id.clone(), now));
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOutcome {
    pub passed: bool,
    pub stats: StatBlock,
    pub deployment_roll: u32,
}

/// Run the stat check and move the quest to Deployed. No reward is granted
/// here; resolution is a separate, privileged step.
pub fn deploy(
    player: &mut Player,
    quest: &Quest,
    class_id: Option<&ClassId>,
) -> EngineResult<DeployOutcome> {
    let stats = player.derived_stats(class_id);
    let passed = stats.meets(&quest.stat_requirements);

    let progress = player
        .quest_progress_mut(&quest.id)
        .ok_or_else(|| EngineError::not_found("quest progress", quest.id.clone()))?;
    progress.deploy(passed)?;
    let deployment_roll = progress.state.deployment_roll();

    Ok(DeployOutcome {
        passed,
        stats,
        deployment_roll,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOutcome {
    /// False when nothing was granted: a failed resolution, or a retry of a
    /// quest that already paid out.
    pub awarded: bool,
    pub xp: Option<XpOutcome>,
}

/// Close out a deployed quest. Success pays the XP/flux reward, mints the
/// optional items, and records the quest as completed exactly once; a retry
/// after success is a benign no-op. Failure just drops the progress entry.
pub fn resolve(
    player: &mut Player,
    quest: &Quest,
    success: bool,
    class_id: Option<&ClassId>,
    rng: &mut impl Rng,
) -> EngineResult<ResolveOutcome> {
    let Some(progress) = player.quest_progress(&quest.id) else {
        if player.completed_quest_ids.contains(&quest.id) {
            return Ok(ResolveOutcome {
                awarded: false,
                xp: None,
            });
        }
        return Err(EngineError::not_found("quest progress", quest.id.clone()));
    };

    if !matches!(progress.state, QuestState::Deployed { .. }) {
        return Err(EngineError::FailedPrecondition(
            "quest has not been deployed".into(),
        ));
    }

    player.remove_quest_progress(&quest.id);
    if !success {
        return Ok(ResolveOutcome {
            awarded: false,
            xp: None,
        });
    }
    if !player.completed_quest_ids.insert(quest.id.clone()) {
        return Ok(ResolveOutcome {
            awarded: false,
            xp: None,
        });
    }

    let xp = apply_xp(player, class_id, quest.xp_reward as i64, rng);
    player.currency += quest.currency_reward;

    if let Some(rarity) = quest.item_reward_rarity {
        let level = player.level();
        let forced = generate_item(level, Some(rarity), rng);
        let bonus = generate_item(level, None, rng);
        let profile = player.resolve_profile_mut(class_id);
        profile.inventory.push(forced);
        profile.inventory.push(bonus);
    }

    Ok(ResolveOutcome {
        awarded: true,
        xp: Some(xp),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalvationOutcome {
    pub roll: u32,
    pub saved: bool,
    pub resolution: Option<ResolveOutcome>,
}

/// Second chance for a quest that failed its stat check: roll the quest's
/// die, and only the maximum face succeeds. A save feeds straight into the
/// success path of `resolve`; any other face leaves the progress entry
/// untouched.
pub fn salvation_roll(
    player: &mut Player,
    quest: &Quest,
    class_id: Option<&ClassId>,
    rng: &mut impl Rng,
) -> EngineResult<SalvationOutcome> {
    if quest.roll_die_sides == 0 {
        return Err(EngineError::InvalidArgument(
            "quest has no salvation die".into(),
        ));
    }

    let progress = player
        .quest_progress(&quest.id)
        .ok_or_else(|| EngineError::not_found("quest progress", quest.id.clone()))?;
    match progress.state {
        QuestState::Deployed { passed: false } => {}
        QuestState::Deployed { passed: true } => {
            return Err(EngineError::FailedPrecondition(
                "quest passed its stat check and needs no salvation".into(),
            ));
        }
        QuestState::Accepted => {
            return Err(EngineError::FailedPrecondition(
                "quest has not been deployed".into(),
            ));
        }
    }

    let roll = rng.gen_range(1..=quest.roll_die_sides);
    if roll == quest.roll_die_sides {
        let resolution = resolve(player, quest, true, class_id, rng)?;
        Ok(SalvationOutcome {
            roll,
            saved: true,
            resolution: Some(resolution),
        })
    } else {
        Ok(SalvationOutcome {
            roll,
            saved: false,
            resolution: None,
        })
    }
}
