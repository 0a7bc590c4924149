//! Configuration surface: base address, credentials and the fixed routes.

use crate::error::{Error, Result};
use std::env;
use std::time::Duration;
use time::macros::format_description;
use time::OffsetDateTime;
use url::Url;

/// CPU utilization above which the loop throttles instead of executing.
pub const CPU_THROTTLE_PERCENT: f64 = 80.0;

/// Memory utilization at or above which the loop throttles.
pub const MEMORY_THROTTLE_PERCENT: f64 = 99.5;

/// Memory utilization above which the degraded-load flag is set.
pub const MEMORY_DEGRADED_PERCENT: f64 = 99.0;

/// Pause applied when throttling and when recovering from a failed iteration.
pub const RECOVERY_PAUSE: Duration = Duration::from_secs(5);

/// Trip used for standalone food-option lookups, which take a trip id in the
/// path even when no reservation is in flight.
pub const FOOD_SAMPLE_TRIP: &str = "D1345";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_USERNAME: &str = "fdse_microservice";
const DEFAULT_PASSWORD: &str = "111111";

/// A fixed origin/destination station pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePair {
    pub from: String,
    pub to: String,
}

impl RoutePair {
    pub fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Base address of the target ticket service.
    pub base_url: Url,
    pub username: String,
    pub password: String,
    /// Travel date used by every search and reservation, `YYYY-MM-DD`.
    pub travel_date: String,
    /// Route served by the high-speed preserve endpoint.
    pub high_speed_route: RoutePair,
    /// Route served by the non-high-speed preserve endpoint.
    pub normal_route: RoutePair,
}

impl WorkloadConfig {
    /// Build a config for the given target with default credentials and the
    /// fixed station pairs, dated today.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            travel_date: today(),
            high_speed_route: RoutePair::new("Shang Hai", "Su Zhou"),
            normal_route: RoutePair::new("Shang Hai", "Nan Jing"),
        }
    }

    /// Read the config from `RAILSTORM_BASE_URL`, `RAILSTORM_USERNAME` and
    /// `RAILSTORM_PASSWORD`, falling back to localhost defaults.
    pub fn from_env() -> Result<Self> {
        let raw = env::var("RAILSTORM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw)
            .map_err(|e| Error::Precondition(format!("invalid base url {raw:?}: {e}")))?;

        let mut config = Self::new(base_url);
        if let Ok(username) = env::var("RAILSTORM_USERNAME") {
            config.username = username;
        }
        if let Ok(password) = env::var("RAILSTORM_PASSWORD") {
            config.password = password;
        }
        Ok(config)
    }
}

fn today() -> String {
    let format = format_description!("[year]-[month]-[day]");
    OffsetDateTime::now_utc()
        .date()
        .format(&format)
        .unwrap_or_else(|_| String::from("1970-01-01"))
}
