use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::autoplay::bot::RunStats;
use crate::error::Result;

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Averages over a batch of runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub runs: usize,
    pub avg_delivered: f64,
    pub avg_coins: f64,
    pub avg_failed: f64,
    pub best_seed: Option<u64>,
    pub best_coins: u32,
}

pub fn summarize(results: &[RunStats]) -> BatchSummary {
    if results.is_empty() {
        return BatchSummary::default();
    }
    let n = results.len() as f64;
    let best = results.iter().max_by_key(|r| r.coins);

    BatchSummary {
        runs: results.len(),
        avg_delivered: results.iter().map(|r| r.delivered as f64).sum::<f64>() / n,
        avg_coins: results.iter().map(|r| r.coins as f64).sum::<f64>() / n,
        avg_failed: results.iter().map(|r| r.failed_deliveries as f64).sum::<f64>() / n,
        best_seed: best.map(|r| r.seed),
        best_coins: best.map(|r| r.coins).unwrap_or(0),
    }
}

/// Print one line per run followed by the averages.
pub fn print_runs(results: &[RunStats]) {
    println!();
    println!("=== Autoplay Runs ===");
    println!(
        "{:>4} {:>12} {:>9} {:>6} {:>7} {:>8} {:>9}",
        "run", "seed", "delivered", "coins", "failed", "trashed", "abandoned"
    );
    for (i, run) in results.iter().enumerate() {
        println!(
            "{:>4} {:>12} {:>9} {:>6} {:>7} {:>8} {:>9}",
            i + 1,
            run.seed,
            run.delivered,
            run.coins,
            run.failed_deliveries,
            run.trashed,
            run.abandoned_orders
        );
    }

    let summary = summarize(results);
    println!();
    println!("--- Summary ---");
    println!("Runs: {}", summary.runs);
    println!("Avg delivered: {:.2}", summary.avg_delivered);
    println!("Avg coins: {:.2}", summary.avg_coins);
    if let Some(seed) = summary.best_seed {
        println!("Best run: seed {} with {} coins", seed, summary.best_coins);
    }
    println!();
}

/// Write all runs to a CSV file.
pub fn write_csv(results: &[RunStats], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "run",
        "seed",
        "delivered",
        "coins",
        "failed_deliveries",
        "trashed",
        "actions",
        "abandoned_orders",
    ])?;

    for (i, run) in results.iter().enumerate() {
        wtr.write_record([
            (i + 1).to_string(),
            run.seed.to_string(),
            run.delivered.to_string(),
            run.coins.to_string(),
            run.failed_deliveries.to_string(),
            run.trashed.to_string(),
            run.actions.to_string(),
            run.abandoned_orders.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the batch averages and the per-run records to a JSON file.
pub fn write_summary_json(results: &[RunStats], path: &Path) -> Result<()> {
    let summary = summarize(results);
    let json = serde_json::json!({
        "summary": {
            "runs": summary.runs,
            "avg_delivered": truncate(summary.avg_delivered, 2),
            "avg_coins": truncate(summary.avg_coins, 2),
            "avg_failed_deliveries": truncate(summary.avg_failed, 2),
            "best_seed": summary.best_seed,
            "best_coins": summary.best_coins,
        },
        "runs": results,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}
