use ranksheet_core::storage::store::Store;

use super::{ensure_parent_dir, exit_codes};
use crate::cli::args::StatsArgs;

pub fn run(args: StatsArgs) -> anyhow::Result<i32> {
    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    store.init_schema()?;

    let stats = store.stats_best_effort()?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("rows: {}", fmt_count(stats.rows));
        println!("ranked rows: {}", fmt_count(stats.ranked_rows));
        println!("unscored rows: {}", fmt_count(stats.unscored_rows));
        if let Some(id) = stats.last_row_id {
            println!("last row: {}", id);
        }
        if let Some(at) = &stats.last_submitted_at {
            println!("last submitted at: {}", at);
        }
    }
    Ok(exit_codes::OK)
}

fn fmt_count(n: Option<u64>) -> String {
    n.map_or_else(|| "?".to_string(), |v| v.to_string())
}
