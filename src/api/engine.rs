//! The dispatcher: authenticates the caller, routes each request to its
//! component, and runs the mutation as one optimistic transaction.

use super::types::{Request, Response};
use crate::boss::logic::{rank_participants, submit_answer};
use crate::boss::types::{BossOutcome, CombatStats};
use crate::core::actor::{require_actor, Actor};
use crate::core::constants::SELF_AWARD_MAX_XP;
use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::{BossId, ClassId, PlayerId, QuestId, QuestionId, ResourceId};
use crate::core::store::Store;
use crate::engagement;
use crate::engagement::types::{ClassSettings, EngagementMetrics, XpEvent};
use crate::items::crafting::{apply_operation, CraftOperation};
use crate::items::equipment::Equipment;
use crate::items::types::Item;
use crate::player::ledger::apply_xp;
use crate::quests;
use rand::Rng;
use uuid::Uuid;

pub struct Engine {
    store: Store,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            store: Store::new(),
        }
    }

    pub fn with_store(store: Store) -> Self {
        Self { store }
    }

    /// Direct store access for seeding quests, bosses, events, and player
    /// records.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Entry point for production callers: bills at the current wall clock.
    pub fn dispatch_now(&self, actor: Option<&Actor>, request: Request) -> EngineResult<Response> {
        self.dispatch(actor, request, chrono::Utc::now().timestamp())
    }

    /// Dispatch at an explicit timestamp, with ambient randomness.
    pub fn dispatch(
        &self,
        actor: Option<&Actor>,
        request: Request,
        now: i64,
    ) -> EngineResult<Response> {
        let mut rng = rand::thread_rng();
        self.dispatch_with_rng(actor, request, now, &mut rng)
    }

    /// Same as `dispatch` with an injected random source, so tests can pin
    /// every roll.
    pub fn dispatch_with_rng(
        &self,
        actor: Option<&Actor>,
        request: Request,
        now: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        let actor = require_actor(actor)?;
        match request {
            Request::AwardXp {
                target,
                amount,
                class_id,
            } => self.award_xp(actor, target, amount, class_id, rng),
            Request::AcceptQuest { quest_id, class_id } => {
                self.accept_quest(actor, &quest_id, class_id, now)
            }
            Request::DeployQuest { quest_id, class_id } => {
                self.deploy_quest(actor, &quest_id, class_id)
            }
            Request::ResolveQuest {
                player_id,
                quest_id,
                success,
                class_id,
            } => self.resolve_quest(actor, &player_id, &quest_id, success, class_id, rng),
            Request::SalvationRoll {
                player_id,
                quest_id,
                class_id,
            } => self.salvation_roll(actor, &player_id, &quest_id, class_id, rng),
            Request::EquipItem { item_id, class_id } => self.equip_item(actor, item_id, class_id),
            Request::DisenchantItem { item_id, class_id } => {
                self.disenchant_item(actor, item_id, class_id)
            }
            Request::CraftItem {
                item_id,
                operation,
                class_id,
            } => self.craft_item(actor, item_id, operation, class_id, rng),
            Request::AdminSetInventory {
                player_id,
                class_id,
                items,
                currency,
            } => self.admin_set_inventory(actor, &player_id, class_id, items, currency),
            Request::AdminSetEquipped {
                player_id,
                class_id,
                equipped,
            } => self.admin_set_equipped(actor, &player_id, class_id, equipped),
            Request::AdminPutXpEvent { event } => self.admin_put_event(actor, event),
            Request::AdminSetClassXpRate {
                class_id,
                rate_per_minute,
            } => self.admin_set_class_rate(actor, class_id, rate_per_minute),
            Request::SubmitEngagement {
                resource_id,
                metrics,
                class_id,
            } => self.submit_engagement(actor, &resource_id, metrics, class_id, now, rng),
            Request::SubmitBossAnswer {
                boss_id,
                question_id,
                correct,
            } => self.submit_boss_answer(actor, &boss_id, &question_id, correct, now, rng),
            Request::FinalizeBoss { boss_id } => self.finalize_boss(actor, &boss_id, now, rng),
        }
    }

    fn award_xp(
        &self,
        actor: &Actor,
        target: Option<PlayerId>,
        amount: i64,
        class_id: Option<ClassId>,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        let target = target.unwrap_or_else(|| actor.player_id.clone());
        actor.require_self_or_elevated(&target)?;
        if !actor.elevated && !(0..=SELF_AWARD_MAX_XP).contains(&amount) {
            return Err(EngineError::InvalidArgument(format!(
                "self-issued award must be between 0 and {SELF_AWARD_MAX_XP}"
            )));
        }

        let outcome = self
            .store
            .update_player(&target, |player| {
                Ok(apply_xp(player, class_id.as_ref(), amount, rng))
            })?;
        Ok(Response::Xp(outcome))
    }

    fn accept_quest(
        &self,
        actor: &Actor,
        quest_id: &QuestId,
        class_id: Option<ClassId>,
        now: i64,
    ) -> EngineResult<Response> {
        let quest = self
            .store
            .read_quest(quest_id)
            .ok_or_else(|| EngineError::not_found("quest", quest_id.clone()))?;
        self.store.update_player(&actor.player_id, |player| {
            quests::accept(player, &quest, class_id.as_ref(), now)
        })?;
        Ok(Response::QuestAccepted)
    }

    fn deploy_quest(
        &self,
        actor: &Actor,
        quest_id: &QuestId,
        class_id: Option<ClassId>,
    ) -> EngineResult<Response> {
        let quest = self
            .store
            .read_quest(quest_id)
            .ok_or_else(|| EngineError::not_found("quest", quest_id.clone()))?;
        let outcome = self.store.update_player(&actor.player_id, |player| {
            quests::deploy(player, &quest, class_id.as_ref())
        })?;
        Ok(Response::QuestDeployed(outcome))
    }

    fn resolve_quest(
        &self,
        actor: &Actor,
        player_id: &PlayerId,
        quest_id: &QuestId,
        success: bool,
        class_id: Option<ClassId>,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        let quest = self
            .store
            .read_quest(quest_id)
            .ok_or_else(|| EngineError::not_found("quest", quest_id.clone()))?;
        let outcome = self.store.update_player(player_id, |player| {
            quests::resolve(player, &quest, success, class_id.as_ref(), rng)
        })?;
        Ok(Response::QuestResolved(outcome))
    }

    fn salvation_roll(
        &self,
        actor: &Actor,
        player_id: &PlayerId,
        quest_id: &QuestId,
        class_id: Option<ClassId>,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        let quest = self
            .store
            .read_quest(quest_id)
            .ok_or_else(|| EngineError::not_found("quest", quest_id.clone()))?;
        let outcome = self.store.update_player(player_id, |player| {
            quests::salvation_roll(player, &quest, class_id.as_ref(), rng)
        })?;
        Ok(Response::Salvation(outcome))
    }

    fn equip_item(
        &self,
        actor: &Actor,
        item_id: Uuid,
        class_id: Option<ClassId>,
    ) -> EngineResult<Response> {
        let slot = self.store.update_player(&actor.player_id, |player| {
            player.resolve_profile_mut(class_id.as_ref()).equip(&item_id)
        })?;
        Ok(Response::Equipped { slot })
    }

    fn disenchant_item(
        &self,
        actor: &Actor,
        item_id: Uuid,
        class_id: Option<ClassId>,
    ) -> EngineResult<Response> {
        let (currency_gained, new_currency) =
            self.store.update_player(&actor.player_id, |player| {
                let gained = player
                    .resolve_profile_mut(class_id.as_ref())
                    .disenchant(&item_id)?;
                player.currency += gained;
                Ok((gained, player.currency))
            })?;
        Ok(Response::Disenchanted {
            currency_gained,
            new_currency,
        })
    }

    fn craft_item(
        &self,
        actor: &Actor,
        item_id: Uuid,
        operation: CraftOperation,
        class_id: Option<ClassId>,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        let cost = operation.cost();
        let (item, new_currency) = self.store.update_player(&actor.player_id, |player| {
            if player.currency < cost {
                return Err(EngineError::FailedPrecondition(format!(
                    "{} costs {} flux, player has {}",
                    operation.name(),
                    cost,
                    player.currency
                )));
            }
            let level = player.level();
            let item = player
                .resolve_profile_mut(class_id.as_ref())
                .find_item_mut(&item_id)
                .ok_or_else(|| EngineError::not_found("item", item_id.to_string()))?;
            apply_operation(item, operation, level, rng)?;
            let item = item.clone();
            player.currency -= cost;
            Ok((item, player.currency))
        })?;
        Ok(Response::Crafted { item, new_currency })
    }

    fn admin_set_inventory(
        &self,
        actor: &Actor,
        player_id: &PlayerId,
        class_id: Option<ClassId>,
        items: Vec<Item>,
        currency: u64,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        self.store.update_player(player_id, |player| {
            player.resolve_profile_mut(class_id.as_ref()).inventory = items.clone();
            player.currency = currency;
            Ok(())
        })?;
        Ok(Response::Updated)
    }

    fn admin_set_equipped(
        &self,
        actor: &Actor,
        player_id: &PlayerId,
        class_id: Option<ClassId>,
        equipped: Equipment,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        self.store.update_player(player_id, |player| {
            player.resolve_profile_mut(class_id.as_ref()).equipped = equipped.clone();
            Ok(())
        })?;
        Ok(Response::Updated)
    }

    fn admin_put_event(&self, actor: &Actor, event: XpEvent) -> EngineResult<Response> {
        actor.require_elevated()?;
        if event.multiplier <= 0.0 {
            return Err(EngineError::InvalidArgument(
                "event multiplier must be positive".into(),
            ));
        }
        self.store.put_event(event);
        Ok(Response::Updated)
    }

    fn admin_set_class_rate(
        &self,
        actor: &Actor,
        class_id: ClassId,
        rate_per_minute: f64,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        if rate_per_minute < 0.0 {
            return Err(EngineError::InvalidArgument(
                "XP rate cannot be negative".into(),
            ));
        }
        self.store.put_class_settings(
            class_id,
            ClassSettings {
                xp_rate_per_minute: rate_per_minute,
            },
        );
        Ok(Response::Updated)
    }

    fn submit_engagement(
        &self,
        actor: &Actor,
        resource_id: &ResourceId,
        metrics: EngagementMetrics,
        class_id: Option<ClassId>,
        now: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        let rate_override = class_id
            .as_ref()
            .and_then(|class| self.store.read_class_settings(class))
            .map(|settings| settings.xp_rate_per_minute);
        let events = self.store.events_snapshot();

        let outcome = self.store.update_player(&actor.player_id, |player| {
            engagement::submit(
                player,
                resource_id,
                metrics,
                class_id.as_ref(),
                rate_override,
                &events,
                now,
                rng,
            )
        })?;
        Ok(Response::Engagement(outcome))
    }

    fn submit_boss_answer(
        &self,
        actor: &Actor,
        boss_id: &BossId,
        question_id: &QuestionId,
        correct: bool,
        now: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        let outcome = self
            .store
            .update_player_and_boss(&actor.player_id, boss_id, |player, boss| {
                submit_answer(player, boss, question_id, correct, now, rng)
            })?;

        // The killing blow settles the encounter in the same call.
        if outcome.defeated {
            self.finalize_encounter(boss_id, now, rng)?;
        }
        Ok(Response::BossAnswer(outcome))
    }

    fn finalize_boss(
        &self,
        actor: &Actor,
        boss_id: &BossId,
        now: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<Response> {
        actor.require_elevated()?;
        let boss = self
            .store
            .read_boss(boss_id)
            .ok_or_else(|| EngineError::not_found("boss", boss_id.clone()))?;
        if boss.outcome.is_none() && !boss.defeated() && now < boss.deadline {
            return Err(EngineError::FailedPrecondition(
                "encounter is still open".into(),
            ));
        }
        let outcome = self.finalize_encounter(boss_id, now, rng)?;
        Ok(Response::BossFinalized(outcome))
    }

    /// Rank participants, record the outcome on the boss, and pay the
    /// qualifying players. The boss-record commit decides the single
    /// winner among concurrent finalizers; losers observe the stored
    /// outcome and pay nothing.
    fn finalize_encounter(
        &self,
        boss_id: &BossId,
        now: i64,
        rng: &mut impl Rng,
    ) -> EngineResult<BossOutcome> {
        let mut already_finalized = false;
        let outcome = self.store.update_boss(boss_id, |boss| {
            if let Some(existing) = &boss.outcome {
                already_finalized = true;
                return Ok(existing.clone());
            }
            already_finalized = false;

            let participants: Vec<(PlayerId, CombatStats)> = self
                .store
                .players_snapshot()
                .into_iter()
                .filter_map(|(id, player)| {
                    player.combat.get(boss_id).cloned().map(|stats| (id, stats))
                })
                .collect();

            let outcome = rank_participants(boss, &participants, now);
            boss.outcome = Some(outcome.clone());
            boss.is_active = false;
            Ok(outcome)
        })?;

        if !already_finalized {
            for ranking in &outcome.rankings {
                if ranking.reward_multiplier.is_none() {
                    continue;
                }
                self.store.update_player(&ranking.player_id, |player| {
                    apply_xp(player, None, ranking.xp_awarded as i64, rng);
                    player.currency += ranking.currency_awarded;
                    Ok(())
                })?;
            }
        }
        Ok(outcome)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
