use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use fpl_sim::config::{EngineConfig, load_dotenv};
use fpl_sim::logging::init_tracing;
use fpl_sim::predict;
use fpl_sim::selection::{Chip, TeamSelection};
use fpl_sim::sqlite_store::SqliteStore;

const DEFAULT_DB: &str = "fpl.db";

fn main() -> Result<()> {
    load_dotenv();
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = arg_value(&args, "--db")
        .map(PathBuf::from)
        .or_else(|| std::env::var("FPL_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));
    let gw = arg_value(&args, "--gw")
        .context("missing --gw <gameweek>")?
        .parse::<u32>()
        .context("--gw must be a positive integer")?;

    let starting = parse_ids(&arg_value(&args, "--starting").context("missing --starting")?)?;
    let mut selection = TeamSelection::new(starting);
    if let Some(raw) = arg_value(&args, "--bench") {
        selection = selection.with_bench(parse_ids(&raw)?);
    }
    if let Some(raw) = arg_value(&args, "--captain") {
        selection = selection.with_captain(raw.parse().context("invalid --captain id")?);
    }
    if let Some(raw) = arg_value(&args, "--vice") {
        selection = selection.with_vice_captain(raw.parse().context("invalid --vice id")?);
    }
    if has_flag(&args, "--triple-captain") {
        selection = selection.with_chip(Chip::TripleCaptain);
    }
    if has_flag(&args, "--bench-boost") {
        selection = selection.with_chip(Chip::BenchBoost);
    }

    let mut cfg = EngineConfig::from_env();
    if let Some(raw) = arg_value(&args, "--sims") {
        cfg = cfg.with_sims(raw.parse().context("invalid --sims")?);
    }
    if let Some(raw) = arg_value(&args, "--seed") {
        cfg = cfg.with_seed(raw.parse().context("invalid --seed")?);
    }

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("open fantasy db {}", db_path.display()))?;
    let dist = predict::predict_team(&store, &selection, gw, &cfg)
        .with_context(|| format!("predict team for GW{gw}"))?;

    if has_flag(&args, "--json") {
        println!("{}", serde_json::to_string_pretty(&dist.to_json())?);
        return Ok(());
    }

    println!("GW{gw} team projection ({} sims)", cfg.n_sims);
    println!("Expected: {:.2}", dist.expected());
    println!("Median:   {:.2}", dist.median());
    println!("P25:      {:.2}", dist.p25());
    println!("P75:      {:.2}", dist.p75());
    println!("P90:      {:.2}", dist.p90());

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

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn parse_ids(raw: &str) -> Result<Vec<u32>> {
    raw.split([',', ';', ' '])
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| anyhow!("invalid player id {part:?}"))
        })
        .collect()
}
