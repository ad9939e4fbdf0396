use chrono::Duration as IdleDuration;
use std::sync::Arc;
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use crate::metrics::TRACKED_CLIENTS;
use crate::state::AppState;

// Idle sweep - drops heat records nobody touched for `idle_for`
pub async fn idle_sweeper(state: Arc<AppState>, every: Duration, idle_for: IdleDuration) {
    let mut interval = interval(every);

    info!(?every, idle_secs = idle_for.num_seconds(), "idle sweeper started");

    loop {
        interval.tick().await;
        sweep_once(&state, idle_for);
    }
}

pub fn sweep_once(state: &AppState, idle_for: IdleDuration) -> usize {
    let removed = match state.tracker.evict_idle(idle_for) {
        Ok(n) => n,
        Err(e) => {
            warn!(error = %e, "idle sweep failed");
            0
        }
    };

    let tracked = state.tracker.tracked_clients();
    TRACKED_CLIENTS.set(tracked as f64);

    if removed > 0 {
        info!(removed, tracked, "idle heat records evicted");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::heat::HeatPolicy;
    use crate::models::ClientId;
    use crate::store::MemoryStore;
    use crate::tracker::HeatTracker;
    use chrono::{TimeZone, Utc};

    #[test]
    fn sweep_once_evicts_and_updates_gauge() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let tracker = HeatTracker::new(
            Arc::new(MemoryStore::new()),
            clock.clone(),
            HeatPolicy::default(),
        );
        let state = AppState::new(tracker);

        let stale = ClientId::parse("sweep-stale").unwrap();
        state.tracker.record_request(&stale).unwrap();
        clock.advance(IdleDuration::hours(3));

        assert_eq!(sweep_once(&state, IdleDuration::hours(1)), 1);
        assert_eq!(state.tracker.tracked_clients(), 0);
        assert_eq!(sweep_once(&state, IdleDuration::hours(1)), 0);
    }
}
