//! Identifier aliases for records owned by external collaborators.
//!
//! Player, class, and section ids are issued by the authentication and
//! roster services and treated as opaque strings here. Item and submission
//! ids are minted by this engine as UUIDs.

pub type PlayerId = String;
pub type ClassId = String;
pub type SectionId = String;
pub type QuestId = String;
pub type BossId = String;
pub type QuestionId = String;
pub type ResourceId = String;
pub type EventId = String;
