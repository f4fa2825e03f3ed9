use std::path::PathBuf;

use anyhow::Context as _;
use pushwall_dataset::{ProcessedRow, Stations, processed};
use pushwall_model::ParamBounds;
use pushwall_surrogate::{DenseNetwork, NormBounds, SurrogateModel, TrainingSummary};
use pushwall_training::{self as training, TrainerConfig};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training subset CSV
    #[arg(long)]
    train: PathBuf,
    /// Validation subset CSV (scored after training)
    #[arg(long)]
    validation: PathBuf,
    /// Hidden layer widths
    #[arg(long, value_delimiter = ',', default_values_t = [200, 200, 200])]
    hidden: Vec<usize>,
    /// Maximum training epochs
    #[arg(long, default_value_t = TrainerConfig::default().max_epochs)]
    max_epochs: usize,
    /// Mini-batch size
    #[arg(long, default_value_t = TrainerConfig::default().batch_size)]
    batch_size: usize,
    /// Adam learning rate
    #[arg(long, default_value_t = TrainerConfig::default().learning_rate)]
    learning_rate: f64,
    /// Early-stopping patience in epochs
    #[arg(long, default_value_t = TrainerConfig::default().patience)]
    patience: usize,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Model name stored in the artifact
    #[arg(long, default_value = "pushwall-surrogate")]
    name: String,
    /// Artifact file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn to_training_pairs(
    bounds: &NormBounds,
    rows: &[ProcessedRow],
) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    let inputs = rows
        .iter()
        .map(|row| bounds.normalize_params(&row.params).to_vec())
        .collect();
    let targets = rows.iter().map(|row| row.targets.to_vec()).collect();
    (inputs, targets)
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let train_rows = processed::read_rows_from_path(&arg.train)
        .with_context(|| format!("Failed to read training set: {}", arg.train.display()))?;
    let validation_rows = processed::read_rows_from_path(&arg.validation)
        .with_context(|| format!("Failed to read validation set: {}", arg.validation.display()))?;
    eprintln!(
        "Loaded {} training and {} validation row(s)",
        train_rows.len(),
        validation_rows.len()
    );

    let bounds = NormBounds::from_params(&ParamBounds::reference())?;
    let (inputs, targets) = to_training_pairs(&bounds, &train_rows);

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut network = DenseNetwork::random(bounds.mins().len(), &arg.hidden, 6, &mut rng);

    let config = TrainerConfig {
        max_epochs: arg.max_epochs,
        batch_size: arg.batch_size,
        learning_rate: arg.learning_rate,
        patience: arg.patience,
        ..TrainerConfig::default()
    };
    eprintln!("Training {:?} network (seed {seed})", arg.hidden);
    let report = training::train(&config, &mut network, &inputs, &targets, &mut rng, |stats| {
        eprintln!(
            "epoch {:3}: train {:.4}, validation {:.4}",
            stats.epoch, stats.train_loss, stats.validation_loss
        );
    })?;
    eprintln!(
        "Stopped after {} epoch(s), best validation loss {:.4}",
        report.epochs_run, report.best_validation_loss
    );

    // score the held-out validation CSV, the set the split command produced
    let predictions: Vec<Vec<f64>> = validation_rows
        .iter()
        .map(|row| network.forward(&bounds.normalize_params(&row.params)))
        .collect();
    let actuals: Vec<Vec<f64>> = validation_rows
        .iter()
        .map(|row| row.targets.to_vec())
        .collect();
    if let Some(per_output) = training::per_output(&predictions, &actuals) {
        if let Some(avg) = training::average(&per_output) {
            eprintln!(
                "Validation metrics: MSE {:.4}, R {:.4}, R2 {:.4}",
                avg.mse, avg.r, avg.r2
            );
        }
    }

    let model = SurrogateModel::new(
        arg.name.clone(),
        Stations::reference(),
        bounds,
        network,
        TrainingSummary {
            epochs_run: report.epochs_run,
            best_validation_loss: report.best_validation_loss,
        },
    );
    Output::save_json(&model, arg.output.clone())?;
    Ok(())
}
