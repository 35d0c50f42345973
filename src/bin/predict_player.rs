use std::path::PathBuf;

use anyhow::{Context, Result};

use fpl_sim::config::{EngineConfig, load_dotenv};
use fpl_sim::logging::init_tracing;
use fpl_sim::predict;
use fpl_sim::sqlite_store::SqliteStore;

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = arg_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(|| std::env::var("FPL_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("fpl.db"));
    let gw: u32 = arg_value(&args, "--gw")
        .context("missing --gw <gameweek>")?
        .parse()
        .context("--gw must be a positive integer")?;
    let player_id: u32 = arg_value(&args, "--player")
        .context("missing --player <id>")?
        .parse()
        .context("--player must be a numeric id")?;

    let mut cfg = EngineConfig::from_env();
    if let Some(raw) = arg_value(&args, "--seed") {
        cfg = cfg.with_seed(raw.parse().context("invalid --seed")?);
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("open fantasy db {}", db_path.display()))?;
    let pred = predict::predict_player(&store, player_id, gw, &cfg)?;

    let p = &pred.projection;
    println!("Player {player_id} GW{gw}");
    println!("Fixtures: {}", p.fixture_count());
    for (i, ep) in p.fixture_means.iter().enumerate() {
        println!(" - fixture {}: {:.2}", i + 1, ep);
    }
    println!("Mean: {:.2}  Spread: {:.2}", p.expected.mean, p.expected.spread);
    println!("{}", serde_json::to_string(&pred.distribution.to_json())?);

    Ok(())
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}
