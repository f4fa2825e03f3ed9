use std::path::PathBuf;

use anyhow::Context as _;
use pushwall_dataset::{processed, split};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SplitArg {
    /// Processed dataset CSV
    #[arg(long)]
    input: PathBuf,
    /// Training subset CSV to write
    #[arg(long)]
    train_output: PathBuf,
    /// Validation subset CSV to write
    #[arg(long)]
    validation_output: PathBuf,
    /// Number of training rows (taken from the front)
    #[arg(long, default_value_t = 2500)]
    training: usize,
    /// Number of validation rows (taken right after the training rows)
    #[arg(long, default_value_t = 150)]
    validation: usize,
}

pub(crate) fn run(arg: &SplitArg) -> anyhow::Result<()> {
    let rows = processed::read_rows_from_path(&arg.input)
        .with_context(|| format!("Failed to read processed store: {}", arg.input.display()))?;

    let (train, validation) = split(&rows, arg.training, arg.validation)?;

    processed::write_rows_to_path(&arg.train_output, train)
        .with_context(|| format!("Failed to write {}", arg.train_output.display()))?;
    processed::write_rows_to_path(&arg.validation_output, validation)
        .with_context(|| format!("Failed to write {}", arg.validation_output.display()))?;

    eprintln!(
        "Split {} row(s): {} training -> {}, {} validation -> {}",
        rows.len(),
        train.len(),
        arg.train_output.display(),
        validation.len(),
        arg.validation_output.display()
    );
    Ok(())
}
