use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::{ClassId, QuestId, SectionId};
use crate::items::types::{Rarity, StatBlock};
use serde::{Deserialize, Serialize};

/// A quest definition, shared by all players. Progress lives on the player
/// record, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub xp_reward: u64,
    pub currency_reward: u64,
    #[serde(default)]
    pub stat_requirements: StatBlock,
    pub roll_die_sides: u32,
    #[serde(default)]
    pub item_reward_rarity: Option<Rarity>,
    pub is_active: bool,
    #[serde(default)]
    pub target_class: Option<ClassId>,
    #[serde(default)]
    pub target_sections: Vec<SectionId>,
    #[serde(default)]
    pub starts_at: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl Quest {
    /// Active and inside its optional scheduling window.
    pub fn is_open_at(&self, now: i64) -> bool {
        self.is_active
            && self.starts_at.map_or(true, |start| now >= start)
            && self.expires_at.map_or(true, |end| now < end)
    }
}

/// Explicit per-player progress state. Invalid transitions are rejected
/// here rather than filtered at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestState {
    Accepted,
    Deployed { passed: bool },
}

impl QuestState {
    /// Wire representation: 100 for a passed stat check, 0 otherwise.
    pub fn deployment_roll(&self) -> u32 {
        match self {
            QuestState::Deployed { passed: true } => 100,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: QuestId,
    pub state: QuestState,
    pub accepted_at: i64,
}

impl QuestProgress {
    pub fn new(quest_id: QuestId, accepted_at: i64) -> Self {
        Self {
            quest_id,
            state: QuestState::Accepted,
            accepted_at,
        }
    }

    /// Accepted -> Deployed. Re-deploying is rejected so a second check
    /// cannot overwrite the recorded result.
    pub fn deploy(&mut self, passed: bool) -> EngineResult<()> {
        match self.state {
            QuestState::Accepted => {
                self.state = QuestState::Deployed { passed };
                Ok(())
            }
            QuestState::Deployed { .. } => Err(EngineError::FailedPrecondition(
                "quest is already deployed".into(),
            )),
        }
    }
}
