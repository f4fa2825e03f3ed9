use std::path::PathBuf;

use anyhow::Context as _;
use pushwall_dataset::processed;
use pushwall_training as training;

use crate::util::read_model_file;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Model artifact JSON
    #[arg(long)]
    model: PathBuf,
    /// Labeled dataset CSV (17 fields per row)
    #[arg(long)]
    data: PathBuf,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let model = read_model_file(&arg.model)?;
    let rows = processed::read_rows_from_path(&arg.data)
        .with_context(|| format!("Failed to read dataset: {}", arg.data.display()))?;

    let predictions: Vec<Vec<f64>> = rows
        .iter()
        .map(|row| model.predict(&row.params).to_vec())
        .collect();
    let actuals: Vec<Vec<f64>> = rows.iter().map(|row| row.targets.to_vec()).collect();

    let per_output = training::per_output(&predictions, &actuals)
        .with_context(|| format!("Dataset {} is empty", arg.data.display()))?;

    println!("{:>10} {:>12} {:>8} {:>8}", "station", "MSE", "R", "R2");
    for (i, m) in per_output.iter().enumerate() {
        let station = model.stations.values()[i + 1];
        println!("{station:>8}mm {:>12.4} {:>8.4} {:>8.4}", m.mse, m.r, m.r2);
    }
    if let Some(avg) = training::average(&per_output) {
        println!("{:>10} {:>12.4} {:>8.4} {:>8.4}", "average", avg.mse, avg.r, avg.r2);
    }
    Ok(())
}
