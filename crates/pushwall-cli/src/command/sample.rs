use std::path::PathBuf;

use pushwall_dataset::raw_store::{self, RawSample};
use pushwall_model::{
    AnalysisConfig, CommandRunner, DEFAULT_MIN_PEAK_DISPLACEMENT, MeshConfig, ParamBounds,
    ParamSampler, PushoverRunner as _,
};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SampleArg {
    /// Engine command that performs one pushover analysis per invocation
    #[arg(long)]
    engine: PathBuf,
    /// Extra argument passed to the engine command (repeatable)
    #[arg(long = "engine-arg")]
    engine_args: Vec<String>,
    /// Number of parameter vectors to sample
    #[arg(long, default_value_t = 100)]
    samples: usize,
    /// Raw store file to append accepted samples to
    #[arg(long)]
    store: PathBuf,
    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Minimum peak displacement (mm) for a sample to be accepted
    #[arg(long, default_value_t = DEFAULT_MIN_PEAK_DISPLACEMENT)]
    min_peak: f64,
    /// Mesh elements across the wall length
    #[arg(long, default_value_t = MeshConfig::reference().horizontal)]
    mesh_horizontal: u32,
    /// Mesh elements per boundary element
    #[arg(long, default_value_t = MeshConfig::reference().boundary)]
    mesh_boundary: u32,
    /// Mesh elements over the wall height
    #[arg(long, default_value_t = MeshConfig::reference().vertical)]
    mesh_vertical: u32,
    /// Target lateral displacement (mm)
    #[arg(long, default_value_t = AnalysisConfig::reference().target_displacement)]
    target_displacement: f64,
    /// Displacement increment per step (mm)
    #[arg(long, default_value_t = AnalysisConfig::reference().increment)]
    increment: f64,
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn run(arg: &SampleArg) -> anyhow::Result<()> {
    let sampler = ParamSampler::new(ParamBounds::reference())?;
    let mut runner = CommandRunner::new(&arg.engine, arg.engine_args.clone());
    let mesh = MeshConfig {
        horizontal: arg.mesh_horizontal,
        boundary: arg.mesh_boundary,
        vertical: arg.mesh_vertical,
    };
    let analysis = AnalysisConfig {
        target_displacement: arg.target_displacement,
        increment: arg.increment,
    };

    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = Pcg32::seed_from_u64(seed);
    eprintln!("Sampling {} parameter vectors (seed {seed})", arg.samples);

    let mut accepted = 0_usize;
    let mut rejected = 0_usize;
    for i in 0..arg.samples {
        let params = sampler.draw(&mut rng);
        // the engine mutates global simulation state, one analysis at a time
        let curve = runner.run(&params, &mesh, &analysis)?;
        let peak = curve.peak_displacement().unwrap_or(0.0);
        if curve.reaches(arg.min_peak) {
            raw_store::append_sample(&arg.store, &RawSample { params, curve })?;
            accepted += 1;
            eprintln!("sample {i}: accepted (peak {peak:.2} mm)");
        } else {
            rejected += 1;
            eprintln!("sample {i}: rejected (peak {peak:.2} mm < {} mm)", arg.min_peak);
        }
    }

    let yield_ratio = if arg.samples == 0 {
        0.0
    } else {
        accepted as f64 / arg.samples as f64
    };
    eprintln!(
        "Done: {accepted} accepted, {rejected} rejected ({:.1}% yield) -> {}",
        yield_ratio * 100.0,
        arg.store.display()
    );
    Ok(())
}
