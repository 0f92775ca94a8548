//! Versioned in-memory record store with optimistic commits.
//!
//! Every mutating operation follows the same shape: read a snapshot of the
//! record(s) plus their versions, compute the full set of writes in memory,
//! then commit all-or-nothing. A commit only lands if every touched record
//! is still at the version that was read; otherwise the operation retries
//! from a fresh read. Readers never block writers and no lock is held while
//! caller code runs.

use super::constants::MAX_COMMIT_RETRIES;
use super::errors::{EngineError, EngineResult};
use super::ids::{BossId, ClassId, EventId, PlayerId, QuestId};
use crate::boss::types::BossEncounter;
use crate::engagement::types::{ClassSettings, XpEvent};
use crate::player::types::Player;
use crate::quests::types::Quest;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// One table of versioned rows. Version 0 never occurs; a missing row and a
/// present row are distinguished by `version` returning `None`.
pub struct Table<K, V> {
    rows: RwLock<HashMap<K, (u64, V)>>,
}

impl<K: Eq + Hash + Clone, V: Clone> Table<K, V> {
    fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of a row and the version it was read at.
    pub fn read(&self, key: &K) -> Option<(V, u64)> {
        self.rows
            .read()
            .get(key)
            .map(|(version, value)| (value.clone(), *version))
    }

    /// Unconditional upsert, bumping the version. Used for seeding and for
    /// admin overwrites that do not depend on the previous value.
    pub fn put(&self, key: K, value: V) {
        let mut rows = self.rows.write();
        let version = rows.get(&key).map(|(v, _)| *v).unwrap_or(0);
        rows.insert(key, (version + 1, value));
    }

    pub fn keys(&self) -> Vec<K> {
        self.rows.read().keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.rows
            .read()
            .iter()
            .map(|(k, (_, v))| (k.clone(), v.clone()))
            .collect()
    }

    fn version(&self, key: &K) -> Option<u64> {
        self.rows.read().get(key).map(|(v, _)| *v)
    }

    fn force(&self, key: K, version: u64, value: V) {
        self.rows.write().insert(key, (version, value));
    }
}

/// Compare-and-retry update of a single row. The closure runs on a private
/// clone; an `Err` abandons the attempt with nothing written.
fn update_row<K, V, T>(
    gate: &Mutex<()>,
    table: &Table<K, V>,
    key: &K,
    kind: &'static str,
    mut f: impl FnMut(&mut V) -> EngineResult<T>,
) -> EngineResult<T>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    for attempt in 0..MAX_COMMIT_RETRIES {
        let (mut value, version) = table
            .read(key)
            .ok_or_else(|| EngineError::not_found(kind, key.to_string()))?;
        let out = f(&mut value)?;

        let _gate = gate.lock();
        if table.version(key) == Some(version) {
            table.force(key.clone(), version + 1, value);
            return Ok(out);
        }
        drop(_gate);
        tracing::debug!(kind, key = %key, attempt, "conflicting write, retrying");
    }
    tracing::error!(kind, key = %key, "commit retry budget exhausted");
    Err(EngineError::Internal)
}

/// The shared record store. One row per player, quest, boss, XP event, and
/// class settings entry.
pub struct Store {
    players: Table<PlayerId, Player>,
    quests: Table<QuestId, Quest>,
    bosses: Table<BossId, BossEncounter>,
    events: Table<EventId, XpEvent>,
    class_settings: Table<ClassId, ClassSettings>,
    commit_gate: Mutex<()>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            players: Table::new(),
            quests: Table::new(),
            bosses: Table::new(),
            events: Table::new(),
            class_settings: Table::new(),
            commit_gate: Mutex::new(()),
        }
    }

    // === Seeding and plain reads ===

    pub fn put_player(&self, player: Player) {
        self.players.put(player.id.clone(), player);
    }

    pub fn read_player(&self, id: &PlayerId) -> Option<Player> {
        self.players.read(id).map(|(p, _)| p)
    }

    pub fn player_ids(&self) -> Vec<PlayerId> {
        self.players.keys()
    }

    pub fn players_snapshot(&self) -> Vec<(PlayerId, Player)> {
        self.players.snapshot()
    }

    pub fn put_quest(&self, quest: Quest) {
        self.quests.put(quest.id.clone(), quest);
    }

    pub fn read_quest(&self, id: &QuestId) -> Option<Quest> {
        self.quests.read(id).map(|(q, _)| q)
    }

    pub fn put_boss(&self, boss: BossEncounter) {
        self.bosses.put(boss.id.clone(), boss);
    }

    pub fn read_boss(&self, id: &BossId) -> Option<BossEncounter> {
        self.bosses.read(id).map(|(b, _)| b)
    }

    pub fn put_event(&self, event: XpEvent) {
        self.events.put(event.id.clone(), event);
    }

    pub fn events_snapshot(&self) -> Vec<XpEvent> {
        self.events.snapshot().into_iter().map(|(_, e)| e).collect()
    }

    pub fn put_class_settings(&self, class_id: ClassId, settings: ClassSettings) {
        self.class_settings.put(class_id, settings);
    }

    pub fn read_class_settings(&self, class_id: &ClassId) -> Option<ClassSettings> {
        self.class_settings.read(class_id).map(|(s, _)| s)
    }

    // === Transactional updates ===

    pub fn update_player<T>(
        &self,
        id: &PlayerId,
        f: impl FnMut(&mut Player) -> EngineResult<T>,
    ) -> EngineResult<T> {
        update_row(&self.commit_gate, &self.players, id, "player", f)
    }

    pub fn update_boss<T>(
        &self,
        id: &BossId,
        f: impl FnMut(&mut BossEncounter) -> EngineResult<T>,
    ) -> EngineResult<T> {
        update_row(&self.commit_gate, &self.bosses, id, "boss", f)
    }

    /// Joint update of one player and one boss record, committed together.
    /// This is the only cross-player contention point: concurrent answers
    /// race on the boss version and retry.
    pub fn update_player_and_boss<T>(
        &self,
        player_id: &PlayerId,
        boss_id: &BossId,
        mut f: impl FnMut(&mut Player, &mut BossEncounter) -> EngineResult<T>,
    ) -> EngineResult<T> {
        for attempt in 0..MAX_COMMIT_RETRIES {
            let (mut player, player_version) = self
                .players
                .read(player_id)
                .ok_or_else(|| EngineError::not_found("player", player_id.clone()))?;
            let (mut boss, boss_version) = self
                .bosses
                .read(boss_id)
                .ok_or_else(|| EngineError::not_found("boss", boss_id.clone()))?;
            let out = f(&mut player, &mut boss)?;

            let _gate = self.commit_gate.lock();
            if self.players.version(player_id) == Some(player_version)
                && self.bosses.version(boss_id) == Some(boss_version)
            {
                self.players
                    .force(player_id.clone(), player_version + 1, player);
                self.bosses.force(boss_id.clone(), boss_version + 1, boss);
                return Ok(out);
            }
            drop(_gate);
            tracing::debug!(player = %player_id, boss = %boss_id, attempt, "conflicting write, retrying");
        }
        tracing::error!(player = %player_id, boss = %boss_id, "commit retry budget exhausted");
        Err(EngineError::Internal)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
