use crate::core::constants::ENGAGEMENT_COOLDOWN_SECONDS;
use crate::core::ids::{ClassId, EventId, ResourceId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Client-reported engagement figures. Untrusted until validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub engagement_seconds: u32,
}

/// One validated, rewarded submission. Kept for audit until the weekly
/// archive job sweeps it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub resource_id: ResourceId,
    pub class_id: Option<ClassId>,
    pub seconds: u32,
    pub base_xp: u64,
    pub multiplier: f64,
    pub awarded_xp: u64,
    pub submitted_at: i64,
}

/// Per-player submission history plus the cooldown index. Lives on the
/// player record so the cooldown check and the award commit together.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngagementLog {
    pub submissions: Vec<Submission>,
    pub last_by_resource: HashMap<ResourceId, i64>,
}

impl EngagementLog {
    /// Seconds left on the per-resource cooldown, if it has not elapsed.
    pub fn cooldown_remaining(&self, resource_id: &ResourceId, now: i64) -> Option<i64> {
        let last = *self.last_by_resource.get(resource_id)?;
        let elapsed = now - last;
        if elapsed < ENGAGEMENT_COOLDOWN_SECONDS {
            Some(ENGAGEMENT_COOLDOWN_SECONDS - elapsed)
        } else {
            None
        }
    }

    pub fn record(&mut self, submission: Submission) {
        self.last_by_resource
            .insert(submission.resource_id.clone(), submission.submitted_at);
        self.submissions.push(submission);
    }
}

/// A scheduled XP multiplier window, global or scoped to one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XpEvent {
    pub id: EventId,
    pub multiplier: f64,
    pub starts_at: i64,
    pub ends_at: i64,
    #[serde(default)]
    pub target_class: Option<ClassId>,
}

impl XpEvent {
    /// Live right now and either global or matching the submitted class.
    pub fn applies(&self, now: i64, class_id: Option<&ClassId>) -> bool {
        if now < self.starts_at || now >= self.ends_at {
            return false;
        }
        match &self.target_class {
            Some(target) => class_id == Some(target),
            None => true,
        }
    }
}

/// Per-class overrides for engagement conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassSettings {
    pub xp_rate_per_minute: f64,
}
