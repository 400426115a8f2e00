use ranksheet_core::config::write_sample_config;
use ranksheet_core::storage::store::Store;

use super::{ensure_parent_dir, exit_codes};
use crate::cli::args::InitArgs;

pub fn run(args: InitArgs) -> anyhow::Result<i32> {
    if args.config.exists() && !args.force {
        eprintln!(
            "refusing to overwrite {} (use --force)",
            args.config.display()
        );
        return Ok(exit_codes::REJECTED);
    }

    write_sample_config(&args.config).map_err(|e| anyhow::anyhow!("{}", e))?;

    ensure_parent_dir(&args.db)?;
    let store = Store::open(&args.db)?;
    store.init_schema()?;

    eprintln!(
        "wrote {} and initialized {}",
        args.config.display(),
        args.db.display()
    );
    Ok(exit_codes::OK)
}
