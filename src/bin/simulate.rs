//! Local feed simulator.
//!
//! Serves synthetic readings on ws://localhost:$TG_SIM_PORT, one per second
//! per client, and logs any calibration commands it receives.
//! Run with: cargo run --bin simulate

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{interval, Duration};
use tokio_tungstenite::tungstenite::Message;

use touchgrass::feed::CalibrationCommand;
use touchgrass::logging::{json_log, obj, v_str};
use touchgrass::state::Config;

/// Focus 40..=100; one sample in ten is a stress spike.
fn sample() -> Value {
    let mut rng = rand::thread_rng();
    let focus: u32 = rng.gen_range(40..=100);
    let stressed = rng.gen_bool(0.1);
    let stress: u32 = if stressed {
        rng.gen_range(80..=100)
    } else {
        rng.gen_range(0..=30)
    };
    json!({ "focus": focus, "stress": stress, "alert": stressed })
}

async fn serve_client(stream: TcpStream, peer: String) -> Result<()> {
    let ws = tokio_tungstenite::accept_async(stream).await?;
    let (mut write, mut read) = ws.split();
    let mut ticker = interval(Duration::from_secs(1));
    json_log("client_connected", obj(&[("peer", v_str(&peer))]));

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                write.send(Message::Text(sample().to_string())).await?;
            }
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<CalibrationCommand>(&text) {
                        Ok(cmd) => json_log(
                            "command",
                            obj(&[
                                ("command", v_str(&cmd.command)),
                                ("timestamp", json!(cmd.timestamp)),
                            ]),
                        ),
                        Err(err) => {
                            json_log("bad_command", obj(&[("msg", v_str(&err.to_string()))]))
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
            }
        }
    }
    json_log("client_disconnected", obj(&[("peer", v_str(&peer))]));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let listener = TcpListener::bind(("127.0.0.1", cfg.sim_port)).await?;
    json_log("simulator", obj(&[("url", v_str(&format!("ws://localhost:{}", cfg.sim_port)))]));

    loop {
        let (stream, addr) = listener.accept().await?;
        tokio::spawn(async move {
            if let Err(err) = serve_client(stream, addr.to_string()).await {
                json_log("client_error", obj(&[("msg", v_str(&err.to_string()))]));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use touchgrass::feed::decode_frame;

    #[test]
    fn test_sample_ranges() {
        let mut spikes = 0;
        for _ in 0..1_000 {
            let v = sample();
            let focus = v["focus"].as_u64().unwrap();
            let stress = v["stress"].as_u64().unwrap();
            let alert = v["alert"].as_bool().unwrap();
            assert!((40..=100).contains(&focus), "focus {}", focus);
            assert!(stress <= 100, "stress {}", stress);
            assert!(stress <= 30 || stress >= 80, "stress {}", stress);
            assert_eq!(alert, stress >= 80);
            if alert {
                spikes += 1;
            }
        }
        // p = 0.1 over 1000 draws
        assert!((20..=250).contains(&spikes), "spikes {}", spikes);
    }

    #[test]
    fn test_sample_decodes_as_reading() {
        let reading = decode_frame(&sample().to_string()).unwrap();
        assert!(reading.focus >= 40.0);
    }
}
