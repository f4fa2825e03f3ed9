use clap::{Parser, Subcommand};

use self::{
    discretize::DiscretizeArg, evaluate::EvaluateArg, predict::PredictArg, sample::SampleArg,
    split::SplitArg, train::TrainArg,
};

mod discretize;
mod evaluate;
mod predict;
mod sample;
mod split;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Sample wall parameters, run the external engine, and append
    /// accepted results to the raw store
    Sample(#[clap(flatten)] SampleArg),
    /// Discretize raw store shards into the processed dataset CSV
    Discretize(#[clap(flatten)] DiscretizeArg),
    /// Split the processed dataset into training and validation CSVs
    Split(#[clap(flatten)] SplitArg),
    /// Train the surrogate network and save the model artifact
    Train(#[clap(flatten)] TrainArg),
    /// Evaluate a model artifact against a labeled CSV
    Evaluate(#[clap(flatten)] EvaluateArg),
    /// Predict the station curve for one parameter vector
    Predict(#[clap(flatten)] PredictArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Sample(arg) => sample::run(&arg)?,
        Mode::Discretize(arg) => discretize::run(&arg)?,
        Mode::Split(arg) => split::run(&arg)?,
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Evaluate(arg) => evaluate::run(&arg)?,
        Mode::Predict(arg) => predict::run(&arg)?,
    }
    Ok(())
}
