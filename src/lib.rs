//! classquest — server-authoritative progression engine for a classroom
//! gamification platform.
//!
//! Students earn XP and flux by engaging with course resources, equip
//! procedurally generated loot, run stat-gated quests with a salvation die,
//! and fight shared bosses by answering quiz questions. Everything is
//! computed server-side, committed through optimistic transactions, and
//! idempotent against client retries. The presentation layer, chat, and
//! authentication live elsewhere; callers arrive with a verified actor id
//! and talk to [`api::Engine`].

pub mod api;
pub mod archive;
pub mod boss;
pub mod core;
pub mod engagement;
pub mod items;
pub mod player;
pub mod quests;
