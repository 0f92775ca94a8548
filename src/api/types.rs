//! Request and response shapes for the remote-call surface. One variant per
//! operation; the transport layer owns encoding and transport errors.

use crate::boss::logic::AnswerOutcome;
use crate::boss::types::BossOutcome;
use crate::core::ids::{BossId, ClassId, PlayerId, QuestId, QuestionId, ResourceId};
use crate::engagement::logic::EngagementOutcome;
use crate::engagement::types::{EngagementMetrics, XpEvent};
use crate::items::crafting::CraftOperation;
use crate::items::equipment::{EquipSlot, Equipment};
use crate::items::types::Item;
use crate::player::ledger::XpOutcome;
use crate::quests::logic::{DeployOutcome, ResolveOutcome, SalvationOutcome};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Request {
    AwardXp {
        /// Defaults to the caller. Other targets need an elevated role.
        target: Option<PlayerId>,
        amount: i64,
        class_id: Option<ClassId>,
    },
    AcceptQuest {
        quest_id: QuestId,
        class_id: Option<ClassId>,
    },
    DeployQuest {
        quest_id: QuestId,
        class_id: Option<ClassId>,
    },
    ResolveQuest {
        player_id: PlayerId,
        quest_id: QuestId,
        success: bool,
        class_id: Option<ClassId>,
    },
    SalvationRoll {
        player_id: PlayerId,
        quest_id: QuestId,
        class_id: Option<ClassId>,
    },
    EquipItem {
        item_id: Uuid,
        class_id: Option<ClassId>,
    },
    DisenchantItem {
        item_id: Uuid,
        class_id: Option<ClassId>,
    },
    CraftItem {
        item_id: Uuid,
        operation: CraftOperation,
        class_id: Option<ClassId>,
    },
    AdminSetInventory {
        player_id: PlayerId,
        class_id: Option<ClassId>,
        items: Vec<Item>,
        currency: u64,
    },
    AdminSetEquipped {
        player_id: PlayerId,
        class_id: Option<ClassId>,
        equipped: Equipment,
    },
    AdminPutXpEvent {
        event: XpEvent,
    },
    AdminSetClassXpRate {
        class_id: ClassId,
        rate_per_minute: f64,
    },
    SubmitEngagement {
        resource_id: ResourceId,
        metrics: EngagementMetrics,
        class_id: Option<ClassId>,
    },
    SubmitBossAnswer {
        boss_id: BossId,
        question_id: QuestionId,
        correct: bool,
    },
    FinalizeBoss {
        boss_id: BossId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Xp(XpOutcome),
    QuestAccepted,
    QuestDeployed(DeployOutcome),
    QuestResolved(ResolveOutcome),
    Salvation(SalvationOutcome),
    Equipped {
        slot: EquipSlot,
    },
    Disenchanted {
        currency_gained: u64,
        new_currency: u64,
    },
    Crafted {
        item: Item,
        new_currency: u64,
    },
    /// Admin overwrites and configuration writes.
    Updated,
    Engagement(EngagementOutcome),
    BossAnswer(AnswerOutcome),
    BossFinalized(BossOutcome),
}
