//! Validation and conversion of client-reported engagement into XP.

use super::types::{EngagementMetrics, Submission, XpEvent};
use crate::core::constants::{
    DEFAULT_XP_RATE_PER_MINUTE, ENGAGEMENT_BASE_XP_CAP, MAX_ENGAGEMENT_SECONDS,
    MAX_XP_RATE_PER_MINUTE, MIN_ENGAGEMENT_SECONDS,
};
use crate::core::errors::{EngineError, EngineResult};
use crate::core::ids::{ClassId, ResourceId};
use crate::player::ledger::apply_xp;
use crate::player::types::Player;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementOutcome {
    pub xp_earned: u64,
    pub base_xp: u64,
    pub multiplier: f64,
    pub leveled_up: bool,
}

/// Base XP before events: minutes times the per-minute rate, capped. The
/// class override is itself capped so a misconfigured class cannot flood
/// the ledger.
pub fn base_xp(seconds: u32, rate_override: Option<f64>) -> u64 {
    let rate = rate_override
        .unwrap_or(DEFAULT_XP_RATE_PER_MINUTE)
        .clamp(0.0, MAX_XP_RATE_PER_MINUTE);
    let minutes = seconds as f64 / 60.0;
    let xp = (minutes * rate).round() as u64;
    xp.min(ENGAGEMENT_BASE_XP_CAP)
}

/// Highest multiplier among the events live for this submission; 1.0 when
/// none apply.
pub fn event_multiplier(events: &[XpEvent], now: i64, class_id: Option<&ClassId>) -> f64 {
    events
        .iter()
        .filter(|event| event.applies(now, class_id))
        .map(|event| event.multiplier)
        .fold(1.0, f64::max)
}

/// Validate a submission, enforce the per-resource cooldown, persist the
/// submission record, and push the award through the ledger. Runs inside
/// one player transaction so two concurrent submissions cannot both pass
/// the cooldown check.
pub fn submit(
    player: &mut Player,
    resource_id: &ResourceId,
    metrics: EngagementMetrics,
    class_id: Option<&ClassId>,
    rate_override: Option<f64>,
    events: &[XpEvent],
    now: i64,
    rng: &mut impl Rng,
) -> EngineResult<EngagementOutcome> {
    let seconds = metrics.engagement_seconds;
    if seconds < MIN_ENGAGEMENT_SECONDS {
        return Err(EngineError::InvalidArgument(format!(
            "engagement of {seconds}s is too short to score"
        )));
    }
    if seconds > MAX_ENGAGEMENT_SECONDS {
        return Err(EngineError::InvalidArgument(format!(
            "engagement of {seconds}s is not plausible for one session"
        )));
    }

    if let Some(seconds_remaining) = player.engagement.cooldown_remaining(resource_id, now) {
        return Err(EngineError::ResourceExhausted { seconds_remaining });
    }

    let base = base_xp(seconds, rate_override);
    let multiplier = event_multiplier(events, now, class_id);
    let awarded = (base as f64 * multiplier).round() as u64;

    player.engagement.record(Submission {
        id: Uuid::from_u128(rng.gen()),
        resource_id: resource_id.clone(),
        class_id: class_id.cloned(),
        seconds,
        base_xp: base,
        multiplier,
        awarded_xp: awarded,
        submitted_at: now,
    });

    let xp = apply_xp(player, class_id, awarded as i64, rng);

    Ok(EngagementOutcome {
        xp_earned: awarded,
        base_xp: base,
        multiplier,
        leveled_up: xp.leveled_up,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(31)
    }

    fn metrics(seconds: u32) -> EngagementMetrics {
        EngagementMetrics {
            engagement_seconds: seconds,
        }
    }

    #[test]
    fn test_base_xp_default_rate() {
        // Ten minutes at the default 10 XP/min.
        assert_eq!(base_xp(600, None), 100);
    }

    #[test]
    fn test_base_xp_rounds() {
        // 90 seconds at 10/min is 15.0; 95 seconds rounds from 15.83.
        assert_eq!(base_xp(90, None), 15);
        assert_eq!(base_xp(95, None), 16);
    }

    #[test]
    fn test_base_xp_caps_at_500() {
        assert_eq!(base_xp(14_400, None), 500);
        assert_eq!(base_xp(4000, Some(100.0)), 500);
    }

    #[test]
    fn test_rate_override_is_capped() {
        // 60 seconds at a runaway override still scores at 100/min.
        assert_eq!(base_xp(60, Some(10_000.0)), 100);
    }

    #[test]
    fn test_too_short_session_rejected() {
        let mut player = Player::new("s1");
        let err = submit(
            &mut player,
            &"video-1".to_string(),
            metrics(5),
            None,
            None,
            &[],
            1000,
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "INVALID_ARGUMENT");
        assert_eq!(player.xp, 0);
        assert!(player.engagement.submissions.is_empty());
    }

    #[test]
    fn test_implausibly_long_session_rejected() {
        let mut player = Player::new("s1");
        let err = submit(
            &mut player,
            &"video-1".to_string(),
            metrics(14_401),
            None,
            None,
            &[],
            1000,
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_submission_awards_and_records() {
        let mut player = Player::new("s1");
        let outcome = submit(
            &mut player,
            &"video-1".to_string(),
            metrics(600),
            None,
            None,
            &[],
            1000,
            &mut rng(),
        )
        .unwrap();

        assert_eq!(outcome.base_xp, 100);
        assert_eq!(outcome.xp_earned, 100);
        assert_eq!(player.xp, 100);
        assert_eq!(player.engagement.submissions.len(), 1);
        let record = &player.engagement.submissions[0];
        assert_eq!(record.resource_id, "video-1");
        assert_eq!(record.awarded_xp, 100);
        assert_eq!(record.submitted_at, 1000);
    }

    #[test]
    fn test_resubmission_within_cooldown_rejected() {
        let mut player = Player::new("s1");
        let resource = "video-1".to_string();
        submit(
            &mut player,
            &resource,
            metrics(600),
            None,
            None,
            &[],
            1000,
            &mut rng(),
        )
        .unwrap();

        let err = submit(
            &mut player,
            &resource,
            metrics(600),
            None,
            None,
            &[],
            1100,
            &mut rng(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "RESOURCE_EXHAUSTED");
        assert_eq!(player.xp, 100);

        // After the cooldown the same resource scores again.
        submit(
            &mut player,
            &resource,
            metrics(600),
            None,
            None,
            &[],
            1000 + 300,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(player.xp, 200);
    }

    #[test]
    fn test_highest_applicable_event_wins() {
        let math = "math".to_string();
        let events = vec![
            XpEvent {
                id: "global-boost".to_string(),
                multiplier: 1.5,
                starts_at: 0,
                ends_at: 10_000,
                target_class: None,
            },
            XpEvent {
                id: "math-week".to_string(),
                multiplier: 3.0,
                starts_at: 0,
                ends_at: 10_000,
                target_class: Some(math.clone()),
            },
            XpEvent {
                id: "expired".to_string(),
                multiplier: 10.0,
                starts_at: 0,
                ends_at: 500,
                target_class: None,
            },
        ];

        assert_eq!(event_multiplier(&events, 1000, Some(&math)), 3.0);
        assert_eq!(event_multiplier(&events, 1000, None), 1.5);
        assert_eq!(event_multiplier(&events, 20_000, None), 1.0);
    }

    #[test]
    fn test_multiplier_applied_after_base_cap() {
        let mut player = Player::new("s1");
        let events = vec![XpEvent {
            id: "double".to_string(),
            multiplier: 2.0,
            starts_at: 0,
            ends_at: 10_000,
            target_class: None,
        }];
        let outcome = submit(
            &mut player,
            &"video-1".to_string(),
            metrics(600),
            None,
            None,
            &events,
            1000,
            &mut rng(),
        )
        .unwrap();

        assert_eq!(outcome.base_xp, 100);
        assert_eq!(outcome.multiplier, 2.0);
        assert_eq!(outcome.xp_earned, 200);
        assert_eq!(player.xp, 200);
    }
}
