//! Keyword highlighter for saved pages.
//!
//! Usage:
//!   highlight [input.html] [--out=output.html]
//!
//! Reads stdin when no input is given. Keywords come from TG_KEYWORDS.

use anyhow::{Context, Result};
use serde_json::json;
use std::io::Read;

use touchgrass::highlight::Highlighter;
use touchgrass::logging::{log, obj, v_str, Domain, Level};
use touchgrass::state::Config;

fn main() -> Result<()> {
    let cfg = Config::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let out_path = args.iter().find_map(|a| a.strip_prefix("--out=").map(|s| s.to_string()));
    let in_path = args.iter().find(|a| !a.starts_with("--"));

    let input = match in_path {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
            buf
        }
    };

    let result = Highlighter::new(cfg.keywords.as_slice()).apply(&input);
    log(
        Level::Debug,
        Domain::Highlight,
        "highlighted",
        obj(&[
            ("source", v_str(in_path.map(|s| s.as_str()).unwrap_or("stdin"))),
            ("matches", json!(result.matches)),
        ]),
    );

    match out_path {
        Some(path) => {
            std::fs::write(&path, result.html).with_context(|| format!("writing {}", path))?
        }
        None => print!("{}", result.html),
    }
    Ok(())
}
