use crate::tracker::HeatTracker;

// app's shared state
pub struct AppState {
    pub tracker: HeatTracker,
}

impl AppState {
    pub fn new(tracker: HeatTracker) -> Self {
        Self { tracker }
    }
}
