//! Integration test: structured records land in the per-run directory.
//!
//! Kept to a single test: the run context is process-global.

use serde_json::Value;

use touchgrass::logging::{log, obj, v_str, Domain, Level};

#[test]
fn test_records_written_to_run_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("LOG_DIR", dir.path());
    std::env::set_var("RUN_ID", "r-test");
    std::env::set_var("LOG_LEVEL", "info");
    std::env::set_var("LOG_DOMAINS", "link,alert");

    log(Level::Warn, Domain::Link, "closed", obj(&[("reason", v_str("peer closed"))]));
    log(Level::Info, Domain::Badge, "badge_text", obj(&[("text", v_str("72"))]));
    log(Level::Debug, Domain::Alert, "alert_suppressed", obj(&[]));

    let run_dir = dir.path().join("r-test");
    let manifest = std::fs::read_to_string(run_dir.join("manifest.json")).unwrap();
    let manifest: Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["run_id"], "r-test");

    let events = std::fs::read_to_string(run_dir.join("events.jsonl")).unwrap();
    let lines: Vec<Value> = events.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    // badge domain filtered out, debug below threshold
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["component"], "link");
    assert_eq!(lines[0]["event"], "closed");
    assert_eq!(lines[0]["lvl"], "WARN");
    assert_eq!(lines[0]["data"]["reason"], "peer closed");

    let trace = std::fs::read_to_string(run_dir.join("trace.jsonl")).unwrap();
    assert!(trace.is_empty());
}
