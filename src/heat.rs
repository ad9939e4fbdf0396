use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// Throttling policy - cap and cooldown length
#[derive(Debug, Clone, Copy)]
pub struct HeatPolicy {
    pub max_requests: u32,
    pub cooldown: Duration,
}

impl Default for HeatPolicy {
    fn default() -> Self {
        Self {
            max_requests: 5,
            cooldown: Duration::hours(1),
        }
    }
}

/// Heat record - one per client identity.
///
/// `count` only grows inside a window and drops back to zero solely through
/// [`HeatRecord::expire`]. `cooldown_until` is set when `count` reaches the cap.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatRecord {
    pub count: u32,
    pub cooldown_until: Option<DateTime<Utc>>,
    pub last_seen: DateTime<Utc>, // eviction bookkeeping only
}

impl HeatRecord {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            cooldown_until: None,
            last_seen: now,
        }
    }

    // Cooldown over..? Full reset. Returns true if a reset happened
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        match self.cooldown_until {
            Some(until) if now > until => {
                self.count = 0;
                self.cooldown_until = None;
                true
            }
            _ => false,
        }
    }

    // Blocked through and including the expiry instant
    pub fn is_cooling(&self, now: DateTime<Utc>) -> bool {
        matches!(self.cooldown_until, Some(until) if now <= until)
    }

    // Cooldown present iff the cap was reached
    pub fn is_consistent(&self, policy: &HeatPolicy) -> bool {
        let capped = self.count >= policy.max_requests;
        capped == self.cooldown_until.is_some()
    }

    pub fn view(&self, policy: &HeatPolicy) -> ThermometerView {
        let level = f64::from(self.count) / f64::from(policy.max_requests) * 100.0;
        ThermometerView {
            current_level: level.min(100.0),
            max_requests: policy.max_requests,
            current_requests: self.count,
            cooldown_date: self
                .cooldown_until
                .map(|until| until.to_rfc3339_opts(SecondsFormat::Millis, true)),
        }
    }
}

// Read-only projection handed to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermometerView {
    pub current_level: f64,
    pub max_requests: u32,
    pub current_requests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 8, 30, 0).unwrap()
    }

    #[test]
    fn expire_resets_only_strictly_after_deadline() {
        let until = t0() + Duration::hours(1);
        let mut record = HeatRecord {
            count: 5,
            cooldown_until: Some(until),
            last_seen: t0(),
        };

        assert!(!record.expire(until));
        assert_eq!(record.count, 5);
        assert!(record.is_cooling(until));

        assert!(record.expire(until + Duration::milliseconds(1)));
        assert_eq!(record.count, 0);
        assert_eq!(record.cooldown_until, None);
        assert!(!record.is_cooling(until + Duration::milliseconds(1)));
    }

    #[test]
    fn level_is_percentage_capped_at_100() {
        let policy = HeatPolicy::default();
        let mut record = HeatRecord::fresh(t0());
        assert_eq!(record.view(&policy).current_level, 0.0);

        record.count = 2;
        assert_eq!(record.view(&policy).current_level, 40.0);

        record.count = 9;
        assert_eq!(record.view(&policy).current_level, 100.0);
    }

    #[test]
    fn view_serializes_like_the_dashboard_expects() {
        let policy = HeatPolicy::default();
        let record = HeatRecord {
            count: 5,
            cooldown_until: Some(t0()),
            last_seen: t0(),
        };

        let json = serde_json::to_value(record.view(&policy)).unwrap();
        assert_eq!(json["currentLevel"], 100.0);
        assert_eq!(json["maxRequests"], 5);
        assert_eq!(json["currentRequests"], 5);
        assert_eq!(json["cooldownDate"], "2024-03-10T08:30:00.000Z");

        let idle = serde_json::to_value(HeatRecord::fresh(t0()).view(&policy)).unwrap();
        assert!(idle.get("cooldownDate").is_none());
    }

    #[test]
    fn consistency_ties_cooldown_to_cap() {
        let policy = HeatPolicy::default();
        let mut record = HeatRecord::fresh(t0());
        assert!(record.is_consistent(&policy));

        record.cooldown_until = Some(t0());
        assert!(!record.is_consistent(&policy));

        record.count = 5;
        assert!(record.is_consistent(&policy));

        record.cooldown_until = None;
        assert!(!record.is_consistent(&policy));
    }
}
