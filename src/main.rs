use anyhow::Result;
use serde_json::json;
use tokio::time::Duration;

use touchgrass::alert::AlertConfig;
use touchgrass::engine::host::ConsoleHost;
use touchgrass::engine::reducer::ReducerConfig;
use touchgrass::engine::Engine;
use touchgrass::feed::{ReconnectPolicy, TelemetryLink, TungsteniteConnector};
use touchgrass::logging::{json_log, obj, v_num, v_str};
use touchgrass::state::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    cfg.validate()?;

    json_log(
        "startup",
        obj(&[
            ("endpoint", v_str(&cfg.endpoint)),
            ("reconnect_ms", v_num(cfg.reconnect_ms as f64)),
            ("cooldown_ms", v_num(cfg.cooldown_ms as f64)),
            ("focus_low", v_num(cfg.focus_low)),
            ("stress_high", v_num(cfg.stress_high)),
        ]),
    );

    let (mut link, events) = TelemetryLink::new(
        TungsteniteConnector,
        &cfg.endpoint,
        ReconnectPolicy::new(cfg.reconnect_ms),
    );
    link.connect();

    let engine = Engine::new(
        ConsoleHost::default(),
        ReducerConfig {
            alert: AlertConfig {
                focus_low: cfg.focus_low,
                stress_high: cfg.stress_high,
                cooldown_ms: cfg.cooldown_ms,
            },
        },
    );
    let engine = engine.run(events, Duration::from_secs(cfg.summary_secs)).await;

    json_log("shutdown", obj(&[("stats", json!(engine.state().stats))]));
    Ok(())
}
