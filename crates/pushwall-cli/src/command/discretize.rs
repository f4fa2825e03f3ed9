use std::path::PathBuf;

use anyhow::Context as _;
use pushwall_dataset::{Discretizer, ProcessedRow, processed, raw_store};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DiscretizeArg {
    /// Raw store shard(s), concatenated sample-wise in argument order
    #[arg(required = true)]
    shards: Vec<PathBuf>,
    /// Processed dataset CSV to write
    #[arg(long)]
    output: PathBuf,
}

pub(crate) fn run(arg: &DiscretizeArg) -> anyhow::Result<()> {
    let discretizer = Discretizer::reference();

    let mut rows = Vec::new();
    for shard in &arg.shards {
        let samples = raw_store::read_samples_from_path(shard)
            .with_context(|| format!("Failed to read raw store: {}", shard.display()))?;
        eprintln!("{}: {} sample(s)", shard.display(), samples.len());
        for sample in &samples {
            let values = discretizer.discretize(&sample.curve);
            rows.push(ProcessedRow::from_discretized(sample.params, values));
        }
    }

    processed::write_rows_to_path(&arg.output, &rows)
        .with_context(|| format!("Failed to write processed store: {}", arg.output.display()))?;
    eprintln!("Wrote {} row(s) -> {}", rows.len(), arg.output.display());
    Ok(())
}
