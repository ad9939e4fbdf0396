//! Per-client heat tracking.
//!
//! Each client accumulates "heat" with every recorded request. Reaching
//! `max_requests` starts a cooldown, and the client is blocked until the
//! cooldown instant has passed. The reset is lazy: it happens on the first
//! call that observes `now > cooldown_until`, which means [`HeatTracker::get_heat`]
//! may write to the store too.

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::heat::{HeatPolicy, HeatRecord, ThermometerView};
use crate::metrics::COOLDOWNS_STARTED;
use crate::models::ClientId;
use crate::store::{HeatStore, StoreError};

// Outcome of recording a request
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    pub blocked: bool,
    pub data: ThermometerView,
}

#[derive(Clone)]
pub struct HeatTracker {
    store: Arc<dyn HeatStore>,
    clock: Arc<dyn Clock>,
    policy: HeatPolicy,
}

impl HeatTracker {
    pub fn new(store: Arc<dyn HeatStore>, clock: Arc<dyn Clock>, policy: HeatPolicy) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &HeatPolicy {
        &self.policy
    }

    /// Current heat for `client`.
    ///
    /// Creates the record on first sight and applies cooldown expiry, so this
    /// is a read that can trigger a state transition.
    pub fn get_heat(&self, client: &ClientId) -> Result<ThermometerView, StoreError> {
        let now = self.clock.now();
        let record = self.store.update(
            client.as_str(),
            HeatRecord::fresh(now),
            &mut |record: &mut HeatRecord| {
                self.settle(client, record, now);
            },
        )?;
        Ok(record.view(&self.policy))
    }

    /// Heat for `client` without creating or writing a record.
    ///
    /// `None` for a client never seen, or whose stored record is unusable.
    /// A finished cooldown is reported as reset but left for the next write.
    pub fn peek_heat(&self, client: &ClientId) -> Result<Option<ThermometerView>, StoreError> {
        let now = self.clock.now();
        let Some(mut record) = self.store.get(client.as_str())? else {
            return Ok(None);
        };
        if !record.is_consistent(&self.policy) {
            return Ok(None);
        }
        record.expire(now);
        Ok(Some(record.view(&self.policy)))
    }

    /// Record one request attempt for `client`.
    ///
    /// Blocked attempts leave `count` untouched. The attempt that reaches the
    /// cap is admitted and starts the cooldown for the ones after it.
    pub fn record_request(&self, client: &ClientId) -> Result<Admission, StoreError> {
        let now = self.clock.now();
        let mut blocked = false;
        let mut started = false;

        let record = self.store.update(
            client.as_str(),
            HeatRecord::fresh(now),
            &mut |record: &mut HeatRecord| {
                // stores that retry may run this more than once
                blocked = false;
                started = false;
                self.settle(client, record, now);

                if record.is_cooling(now) {
                    blocked = true;
                    return;
                }

                record.count = record.count.saturating_add(1);
                if record.count >= self.policy.max_requests {
                    // saturate rather than overflow; the record must still be marked cooling
                    let until = now
                        .checked_add_signed(self.policy.cooldown)
                        .unwrap_or(DateTime::<Utc>::MAX_UTC);
                    record.cooldown_until = Some(until);
                    started = true;
                }
            },
        )?;

        if blocked {
            warn!(client = %client, until = ?record.cooldown_until, "request blocked, client cooling down");
        } else if started {
            COOLDOWNS_STARTED.inc();
            info!(client = %client, count = record.count, until = ?record.cooldown_until, "cap reached, cooldown started");
        } else {
            debug!(client = %client, count = record.count, "request admitted");
        }

        Ok(Admission {
            blocked,
            data: record.view(&self.policy),
        })
    }

    /// Drop records idle for longer than `idle_for`.
    ///
    /// Records still cooling are always kept. An evicted record reads back
    /// exactly like a fresh one.
    pub fn evict_idle(&self, idle_for: Duration) -> Result<usize, StoreError> {
        let now = self.clock.now();
        let removed = self.store.retain(&|_: &str, record: &HeatRecord| {
            record.is_cooling(now) || now - record.last_seen <= idle_for
        })?;
        if removed > 0 {
            debug!(removed, "evicted idle heat records");
        }
        Ok(removed)
    }

    pub fn tracked_clients(&self) -> usize {
        self.store.len()
    }

    // Rebuild corrupt records, then expire a finished cooldown
    fn settle(&self, client: &ClientId, record: &mut HeatRecord, now: DateTime<Utc>) {
        if !record.is_consistent(&self.policy) {
            warn!(client = %client, count = record.count, until = ?record.cooldown_until, "inconsistent heat record, rebuilding");
            *record = HeatRecord::fresh(now);
        }
        if record.expire(now) {
            debug!(client = %client, "cooldown expired, heat reset");
        }
        record.last_seen = now;
    }
}
