use std::path::PathBuf;

use pushwall_dataset::Discretizer;
use pushwall_model::{
    AnalysisConfig, CommandRunner, MeshConfig, PushoverRunner as _, WallParams,
};

use crate::util::read_model_file;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PredictArg {
    /// Model artifact JSON
    #[arg(long)]
    model: PathBuf,
    /// Wall thickness (m)
    #[arg(long)]
    thickness: f64,
    /// Total wall length (m)
    #[arg(long)]
    length: f64,
    /// Boundary-element length fraction of the wall length
    #[arg(long)]
    boundary_length_ratio: f64,
    /// Boundary-element longitudinal reinforcement ratio
    #[arg(long)]
    boundary_long_ratio: f64,
    /// Boundary-element transverse reinforcement ratio
    #[arg(long)]
    boundary_trans_ratio: f64,
    /// Web longitudinal reinforcement ratio
    #[arg(long)]
    web_long_ratio: f64,
    /// Web transverse reinforcement ratio
    #[arg(long)]
    web_trans_ratio: f64,
    /// Axial load ratio
    #[arg(long)]
    axial_load_ratio: f64,
    /// Wall height (m)
    #[arg(long)]
    height: f64,
    /// Concrete compressive strength (Pa)
    #[arg(long)]
    concrete_strength: f64,
    /// Steel yield strength (Pa)
    #[arg(long)]
    steel_yield: f64,
    /// Engine command; when given, a live analysis is run and its
    /// discretized curve is printed next to the prediction
    #[arg(long)]
    engine: Option<PathBuf>,
    /// Extra argument passed to the engine command (repeatable)
    #[arg(long = "engine-arg")]
    engine_args: Vec<String>,
}

impl PredictArg {
    fn params(&self) -> WallParams {
        WallParams {
            thickness: self.thickness,
            length: self.length,
            boundary_length_ratio: self.boundary_length_ratio,
            boundary_long_ratio: self.boundary_long_ratio,
            boundary_trans_ratio: self.boundary_trans_ratio,
            web_long_ratio: self.web_long_ratio,
            web_trans_ratio: self.web_trans_ratio,
            axial_load_ratio: self.axial_load_ratio,
            height: self.height,
            concrete_strength: self.concrete_strength,
            steel_yield: self.steel_yield,
        }
    }
}

pub(crate) fn run(arg: &PredictArg) -> anyhow::Result<()> {
    let model = read_model_file(&arg.model)?;
    let params = arg.params();
    let predicted = model.predict_curve(&params);

    let reference = match &arg.engine {
        Some(engine) => {
            let mut runner = CommandRunner::new(engine, arg.engine_args.clone());
            eprintln!("Running live analysis for comparison...");
            let curve = runner.run(
                &params,
                &MeshConfig::reference(),
                &AnalysisConfig::reference(),
            )?;
            let discretizer = Discretizer::new(
                model.stations,
                pushwall_dataset::DEFAULT_HARDENING_FACTOR,
            );
            Some(discretizer.discretize(&curve))
        }
        None => None,
    };

    match &reference {
        Some(values) => {
            println!("{:>12} {:>14} {:>14}", "station (mm)", "predicted (kN)", "analysis (kN)");
            for (i, (station, shear)) in predicted.iter().enumerate() {
                println!("{station:>12} {shear:>14.2} {:>14.2}", values[i]);
            }
        }
        None => {
            println!("{:>12} {:>14}", "station (mm)", "predicted (kN)");
            for (station, shear) in &predicted {
                println!("{station:>12} {shear:>14.2}");
            }
        }
    }
    Ok(())
}
