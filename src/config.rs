use chrono::Duration;
use clap::Parser;
use thiserror::Error;

use crate::heat::HeatPolicy;

// Upper bound for --cooldown-secs, ten years
const MAX_COOLDOWN_SECS: u64 = 10 * 365 * 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("--max-requests must be at least 1")]
    ZeroMaxRequests,

    #[error("--cooldown-secs {0} is out of range (at most ten years)")]
    CooldownOutOfRange(u64),
}

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "heat-gateway")]
#[command(about = "Per-client request heat tracker with cap and cooldown")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Requests admitted per window before cooldown starts
    #[arg(long, default_value_t = 5)]
    pub max_requests: u32,

    // Cooldown length in seconds
    #[arg(long, default_value_t = 3600)]
    pub cooldown_secs: u64,

    // Evict records idle this many seconds (0 = never)
    #[arg(long, default_value_t = 86_400)]
    pub idle_ttl: u64,

    // Idle sweep interval in seconds
    #[arg(long, default_value_t = 300)]
    pub sweep_interval: u64,

    // Default log filter when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    pub log_level: String,

    // Emit JSON log lines
    #[arg(long, default_value_t = false)]
    pub log_json: bool,
}

impl Args {
    pub fn policy(&self) -> Result<HeatPolicy, ConfigError> {
        if self.max_requests == 0 {
            return Err(ConfigError::ZeroMaxRequests);
        }
        if self.cooldown_secs > MAX_COOLDOWN_SECS {
            return Err(ConfigError::CooldownOutOfRange(self.cooldown_secs));
        }
        let secs = i64::try_from(self.cooldown_secs)
            .map_err(|_| ConfigError::CooldownOutOfRange(self.cooldown_secs))?;
        let cooldown = Duration::try_seconds(secs)
            .ok_or(ConfigError::CooldownOutOfRange(self.cooldown_secs))?;

        Ok(HeatPolicy {
            max_requests: self.max_requests,
            cooldown,
        })
    }

    // None when eviction is disabled
    pub fn idle_ttl(&self) -> Option<Duration> {
        if self.idle_ttl == 0 {
            return None;
        }
        i64::try_from(self.idle_ttl).ok().and_then(Duration::try_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_policy() {
        let args = Args::parse_from(["heat-gateway"]);
        assert_eq!(args.port, 8080);

        let policy = args.policy().unwrap();
        assert_eq!(policy.max_requests, 5);
        assert_eq!(policy.cooldown, Duration::hours(1));
        assert_eq!(args.idle_ttl(), Some(Duration::days(1)));
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "heat-gateway",
            "--port",
            "9000",
            "--max-requests",
            "3",
            "--cooldown-secs",
            "60",
            "--idle-ttl",
            "0",
            "--log-json",
        ]);
        assert_eq!(args.port, 9000);
        assert!(args.log_json);
        assert_eq!(args.idle_ttl(), None);

        let policy = args.policy().unwrap();
        assert_eq!(policy.max_requests, 3);
        assert_eq!(policy.cooldown, Duration::seconds(60));
    }

    #[test]
    fn zero_cap_is_rejected() {
        let args = Args::parse_from(["heat-gateway", "--max-requests", "0"]);
        assert!(matches!(args.policy(), Err(ConfigError::ZeroMaxRequests)));
    }

    #[test]
    fn oversized_cooldown_is_rejected() {
        let args = Args::parse_from(["heat-gateway", "--cooldown-secs", "10000000000000"]);
        assert!(matches!(
            args.policy(),
            Err(ConfigError::CooldownOutOfRange(10_000_000_000_000))
        ));

        let at_limit = MAX_COOLDOWN_SECS.to_string();
        let args = Args::parse_from(["heat-gateway", "--cooldown-secs", at_limit.as_str()]);
        assert!(args.policy().is_ok());
    }
}
