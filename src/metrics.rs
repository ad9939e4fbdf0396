use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Gauge, Histogram, register_counter, register_counter_vec,
    register_gauge, register_histogram,
};


lazy_static! {
    pub static ref HEAT_REQUESTS: CounterVec = register_counter_vec!(
        "heat_requests_total",
        "Heat tracker calls by operation",
        &["op"]
    )
    .unwrap();
    pub static ref ADMITTED: Counter =
        register_counter!("heat_admitted_total", "Requests admitted by the tracker").unwrap();
    pub static ref BLOCKED: Counter =
        register_counter!("heat_blocked_total", "Requests rejected during cooldown").unwrap();
    pub static ref COOLDOWNS_STARTED: Counter =
        register_counter!("heat_cooldowns_started_total", "Clients that hit the cap").unwrap();
    pub static ref STORE_ERRORS: Counter =
        register_counter!("heat_store_errors_total", "Failed heat store operations").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "heat_request_latency_seconds",
        "Heat endpoint latency in seconds"
    )
    .unwrap();
    pub static ref TRACKED_CLIENTS: Gauge =
        register_gauge!("heat_tracked_clients", "Current number of heat records").unwrap();
}
