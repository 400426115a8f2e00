use chrono::Utc;
use ranksheet_core::config::{load_config, AppConfig};
use ranksheet_core::engine::RankEngine;
use ranksheet_core::errors::RankError;
use ranksheet_core::gate;
use ranksheet_core::model::RankQuery;
use ranksheet_core::report::console;
use ranksheet_core::storage::store::Store;

use super::exit_codes;
use crate::cli::args::RankArgs;

pub fn run(args: RankArgs) -> anyhow::Result<i32> {
    // The config file is optional; defaults cover a bare checkout.
    let cfg = if args.config.exists() {
        load_config(&args.config, false).map_err(|e| anyhow::anyhow!("{}", e))?
    } else {
        AppConfig::default()
    };
    tracing::debug!(cooldown_seconds = cfg.cooldown_seconds, "config resolved");

    let store = Store::open(&args.db)?;
    store.init_schema()?;

    if !args.no_wait {
        if let Some(submitted_at) = store.latest_submitted_at(&args.email)? {
            if let Err(e) = gate::check_cooldown(&submitted_at, cfg.cooldown_seconds, Utc::now()) {
                eprintln!("{}", e);
                return Ok(exit_codes::REJECTED);
            }
        }
    }

    let engine = RankEngine::new(store);
    let query = RankQuery {
        name: args.name,
        email: args.email,
    };

    match engine.compute_rank(&query) {
        Ok(report) => {
            if args.format == "json" {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                console::print_rank_report(&report);
            }
            Ok(exit_codes::OK)
        }
        Err(e @ (RankError::Lookup(_) | RankError::Unrankable { .. })) => {
            eprintln!("{}", e);
            Ok(exit_codes::REJECTED)
        }
        Err(RankError::Storage(e)) => Err(e.context("compute rank")),
    }
}
