pub mod bot;
pub mod output;

pub use bot::{Bot, BotConfig, RunStats};
pub use output::{BatchSummary, print_runs, summarize, write_csv, write_summary_json};
