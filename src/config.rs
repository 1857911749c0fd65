use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::calendar::DEFAULT_HORIZON_DAYS;

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub static_dir: PathBuf,
    pub horizon_days: i64,
    pub budget_ms: u64, // 0 = no budget
}

impl Config {
    pub fn load() -> Self {
        Self {
            addr: try_load("SCHEDULER_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000))),
            db_path: PathBuf::from(try_load("SCHEDULER_DB_PATH", "data/db.json".to_string())),
            static_dir: PathBuf::from(try_load("SCHEDULER_STATIC_DIR", "static".to_string())),
            horizon_days: try_load("SCHEDULER_HORIZON_DAYS", DEFAULT_HORIZON_DAYS),
            budget_ms: try_load("SCHEDULER_BUDGET_MS", 2000),
        }
    }

    /// Wall-clock budget for one scheduling run.
    pub fn budget(&self) -> Option<Duration> {
        (self.budget_ms > 0).then(|| Duration::from_millis(self.budget_ms))
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        info!("{key} not set, using default: {default}");
        return default;
    };

    parse_or(key, &raw, default)
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
        default
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_valid() {
        assert_eq!(parse_or("X", " 21 ", 14i64), 21);
    }

    #[test]
    fn test_parse_or_falls_back() {
        assert_eq!(parse_or("X", "two weeks", 14i64), 14);
        let addr = parse_or("X", "nope", SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_budget_zero_disables() {
        let mut config = Config {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            db_path: PathBuf::from("db.json"),
            static_dir: PathBuf::from("static"),
            horizon_days: 14,
            budget_ms: 0,
        };
        assert_eq!(config.budget(), None);
        config.budget_ms = 250;
        assert_eq!(config.budget(), Some(Duration::from_millis(250)));
    }
}
