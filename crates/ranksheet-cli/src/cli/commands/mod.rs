pub mod init;
pub mod rank;
pub mod stats;
pub mod submit;

use crate::cli::args::{Cli, Command};

pub mod exit_codes {
    pub const OK: i32 = 0;
    /// user-correctable: invalid submission, unknown identity, cooldown
    pub const REJECTED: i32 = 1;
    /// operator-facing: config or storage failure
    pub const CONFIG_ERROR: i32 = 2;
}

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Init(args) => init::run(args),
        Command::Submit(args) => submit::run(args),
        Command::Rank(args) => rank::run(args),
        Command::Stats(args) => stats::run(args),
    }
}

/// Create the db's parent directory if the path has one.
pub(crate) fn ensure_parent_dir(db: &std::path::Path) -> anyhow::Result<()> {
    if let Some(dir) = db.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .map_err(|e| anyhow::anyhow!("create {}: {}", dir.display(), e))?;
        }
    }
    Ok(())
}
