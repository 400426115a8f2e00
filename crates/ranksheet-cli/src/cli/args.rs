use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ranksheet",
    version,
    about = "Score recording and rank lookup for exam scoreboards"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Init(InitArgs),
    Submit(SubmitArgs),
    Rank(RankArgs),
    Stats(StatsArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(long, default_value = "ranksheet.yaml")]
    pub config: PathBuf,

    #[arg(long, default_value = ".ranksheet/scores.db", env = "RANKSHEET_DB")]
    pub db: PathBuf,

    /// overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct SubmitArgs {
    #[arg(long, default_value = ".ranksheet/scores.db", env = "RANKSHEET_DB")]
    pub db: PathBuf,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// opaque token from the upstream dedup gate
    #[arg(long)]
    pub device_id: Option<String>,

    #[arg(long)]
    pub category: String,

    #[arg(long)]
    pub shift: String,

    #[arg(long)]
    pub attempted: u32,

    #[arg(long)]
    pub correct: u32,

    #[arg(long)]
    pub wrong: u32,

    /// text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RankArgs {
    #[arg(long, default_value = ".ranksheet/scores.db", env = "RANKSHEET_DB")]
    pub db: PathBuf,

    #[arg(long, default_value = "ranksheet.yaml")]
    pub config: PathBuf,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    /// skip the post-submission cooldown check (operator use)
    #[arg(long)]
    pub no_wait: bool,

    /// text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct StatsArgs {
    #[arg(long, default_value = ".ranksheet/scores.db", env = "RANKSHEET_DB")]
    pub db: PathBuf,

    /// text | json
    #[arg(long, default_value = "text")]
    pub format: String,
}
