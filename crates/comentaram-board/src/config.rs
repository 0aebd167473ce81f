//! Board configuration from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::driver::DriverConfig;
use crate::error::{Error, Result};
use crate::simulation::{SimulationConfig, SimulationMode};

/// Step intervals outside this range still work but the board animation
/// looks wrong.
const ADVISED_STEP_MS: std::ops::RangeInclusive<u64> = 90..=250;

/// Configuration for a board server.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// HTTP listen address
    pub addr: SocketAddr,
    pub driver: DriverConfig,
    pub simulation: SimulationConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            driver: DriverConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup. Unset keys take their default;
    /// set but invalid keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let addr = parse_or(&lookup, "COMENTARAM_ADDR", defaults.addr)?;
        let step_ms = positive(&lookup, "COMENTARAM_STEP_MS", 160)?;
        let rotate_ms = positive(&lookup, "COMENTARAM_ROTATE_MS", 10_000)?;
        let mode = match lookup("COMENTARAM_MODE") {
            Some(raw) => raw.parse::<SimulationMode>()?,
            None => SimulationMode::default(),
        };
        let history = positive(&lookup, "COMENTARAM_HISTORY", 64)? as usize;
        let event_log = positive(&lookup, "COMENTARAM_EVENT_LOG", 1024)? as usize;

        if !ADVISED_STEP_MS.contains(&step_ms) {
            warn!(
                "COMENTARAM_STEP_MS={} is outside {}..={} ms",
                step_ms,
                ADVISED_STEP_MS.start(),
                ADVISED_STEP_MS.end()
            );
        }

        let simulation = SimulationConfig {
            mode,
            history,
            event_log,
            ..defaults.simulation
        };
        simulation.params.validate()?;

        Ok(Self {
            addr,
            driver: DriverConfig {
                step_interval: Duration::from_millis(step_ms),
                rotation_interval: Duration::from_millis(rotate_ms),
            },
            simulation,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| Error::config(key, format!("{:?}: {}", raw, e))),
        None => Ok(default),
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: u64) -> Result<u64> {
    let value = parse_or(lookup, key, default)?;
    if value == 0 {
        return Err(Error::config(key, "must be greater than zero"));
    }
    Ok(value)
}
