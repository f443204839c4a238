use anyhow::{bail, Result};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8765";
pub const MAX_SUMMARY_SECS: u64 = 86_400;
pub const MAX_CALIBRATION_MS: u64 = 3_600_000;
pub const DEFAULT_KEYWORDS: [&str; 4] = ["urgent", "ASAP", "stress", "deadline"];

#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub reconnect_ms: u64,
    pub cooldown_ms: u64,
    pub focus_low: f64,
    pub stress_high: f64,
    pub calibration_ms: u64,
    pub keywords: Vec<String>,
    pub summary_secs: u64,
    pub sim_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect_ms: 3_000,
            cooldown_ms: 60_000,
            focus_low: 20.0,
            stress_high: 85.0,
            calibration_ms: 5_000,
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            summary_secs: 60,
            sim_port: 8765,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(|k| k.to_string())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            endpoint: std::env::var("TG_ENDPOINT").unwrap_or(d.endpoint),
            reconnect_ms: env_parse("TG_RECONNECT_MS", d.reconnect_ms),
            cooldown_ms: env_parse("TG_COOLDOWN_MS", d.cooldown_ms),
            focus_low: env_parse("TG_FOCUS_LOW", d.focus_low),
            stress_high: env_parse("TG_STRESS_HIGH", d.stress_high),
            calibration_ms: env_parse("TG_CALIBRATION_MS", d.calibration_ms),
            keywords: std::env::var("TG_KEYWORDS")
                .map(|v| parse_keywords(&v))
                .unwrap_or(d.keywords),
            summary_secs: env_parse("TG_SUMMARY_SECS", d.summary_secs),
            sim_port: env_parse("TG_SIM_PORT", d.sim_port),
        }
    }

    /// Reject configurations the link cannot run with.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.endpoint)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            bail!("endpoint must be ws:// or wss://, got {}", url.scheme());
        }
        if self.reconnect_ms == 0 {
            bail!("reconnect delay must be positive");
        }
        if !(1..=MAX_SUMMARY_SECS).contains(&self.summary_secs) {
            bail!("summary interval must be 1..={}s, got {}", MAX_SUMMARY_SECS, self.summary_secs);
        }
        if self.calibration_ms > MAX_CALIBRATION_MS {
            bail!("calibration window must be at most {}ms", MAX_CALIBRATION_MS);
        }
        Ok(())
    }
}
