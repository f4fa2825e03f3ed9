//! Mini-batch Adam trainer with early stopping.
//!
//! The trainer consumes normalized inputs and physical-unit targets,
//! holds out a validation fraction from the tail of the training rows
//! (before any shuffling, so the held-out rows are stable across runs),
//! reshuffles the training order every epoch, and stops early when the
//! validation loss has not improved by at least `min_delta` for
//! `patience` epochs. The best-scoring weights seen are restored at the
//! end.

use pushwall_surrogate::{DenseNetwork, NetworkGradients};
use rand::{Rng, seq::SliceRandom as _};

/// Hyperparameters of one training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    pub batch_size: usize,
    pub max_epochs: usize,
    /// Fraction of rows held out from the tail for epoch-wise
    /// validation.
    pub validation_split: f64,
    /// Epochs without sufficient improvement before stopping.
    pub patience: usize,
    /// Minimum validation-loss improvement that counts as progress.
    pub min_delta: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            batch_size: 10,
            max_epochs: 200,
            validation_split: 0.10,
            patience: 5,
            min_delta: 1e-6,
        }
    }
}

/// Losses of one completed epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochStats {
    pub epoch: usize,
    pub train_loss: f64,
    pub validation_loss: f64,
}

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub epochs_run: usize,
    pub best_validation_loss: f64,
    pub history: Vec<EpochStats>,
}

/// Malformed training data or configuration.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum TrainError {
    #[display("training set is empty")]
    EmptyDataset,
    #[display("inputs and targets differ in length: {inputs} vs {targets}")]
    LengthMismatch { inputs: usize, targets: usize },
    #[display("validation split {split} leaves no training rows out of {rows}")]
    DegenerateSplit { rows: usize, split: f64 },
    #[display("batch size must be nonzero")]
    ZeroBatchSize,
}

/// Adam first/second moment state, matching the network layout.
struct AdamState {
    first: NetworkGradients,
    second: NetworkGradients,
    step: u64,
}

impl AdamState {
    fn new(network: &DenseNetwork) -> Self {
        Self {
            first: NetworkGradients::zeroed(network),
            second: NetworkGradients::zeroed(network),
            step: 0,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn apply(&mut self, config: &TrainerConfig, network: &mut DenseNetwork, gradients: &NetworkGradients) {
        self.step += 1;
        let t = self.step as f64;
        let bias1 = 1.0 - config.beta1.powf(t);
        let bias2 = 1.0 - config.beta2.powf(t);

        for (l, layer) in network.layers_mut().iter_mut().enumerate() {
            let grads = &gradients.layers[l];
            let first = &mut self.first.layers[l];
            let second = &mut self.second.layers[l];

            let params = layer.weights.iter_mut().chain(&mut layer.biases);
            let grads = grads.weights.iter().chain(&grads.biases);
            let first = first.weights.iter_mut().chain(&mut first.biases);
            let second = second.weights.iter_mut().chain(&mut second.biases);

            for (((param, &grad), m), v) in params.zip(grads).zip(first).zip(second) {
                *m = config.beta1 * *m + (1.0 - config.beta1) * grad;
                *v = config.beta2 * *v + (1.0 - config.beta2) * grad * grad;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *param -= config.learning_rate * m_hat / (v_hat.sqrt() + config.epsilon);
            }
        }
    }
}

#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn validation_count(rows: usize, split: f64) -> usize {
    (rows as f64 * split).floor() as usize
}

fn mean_loss(network: &DenseNetwork, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    #[expect(clippy::cast_precision_loss)]
    let n = inputs.len() as f64;
    inputs
        .iter()
        .zip(targets)
        .map(|(x, t)| network.loss(x, t))
        .sum::<f64>()
        / n
}

/// Trains `network` in place and returns the run report.
///
/// `on_epoch` is called once per completed epoch, in order; the CLI uses
/// it for progress lines.
pub fn train<R, F>(
    config: &TrainerConfig,
    network: &mut DenseNetwork,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    rng: &mut R,
    mut on_epoch: F,
) -> Result<TrainReport, TrainError>
where
    R: Rng + ?Sized,
    F: FnMut(&EpochStats),
{
    if inputs.is_empty() {
        return Err(TrainError::EmptyDataset);
    }
    if inputs.len() != targets.len() {
        return Err(TrainError::LengthMismatch {
            inputs: inputs.len(),
            targets: targets.len(),
        });
    }
    if config.batch_size == 0 {
        return Err(TrainError::ZeroBatchSize);
    }

    // tail holdout, taken before any shuffling
    let holdout = validation_count(inputs.len(), config.validation_split);
    let fit_rows = inputs.len() - holdout;
    if fit_rows == 0 {
        return Err(TrainError::DegenerateSplit {
            rows: inputs.len(),
            split: config.validation_split,
        });
    }
    let (fit_inputs, val_inputs) = inputs.split_at(fit_rows);
    let (fit_targets, val_targets) = targets.split_at(fit_rows);

    let mut adam = AdamState::new(network);
    let mut order: Vec<usize> = (0..fit_rows).collect();

    let mut history = Vec::new();
    let mut best_loss = f64::INFINITY;
    let mut best_network = network.clone();
    let mut epochs_without_improvement = 0;
    let mut epochs_run = 0;

    for epoch in 0..config.max_epochs {
        epochs_run = epoch + 1;
        order.shuffle(rng);

        let mut epoch_loss_sum = 0.0;
        for batch in order.chunks(config.batch_size) {
            let mut batch_gradients = NetworkGradients::zeroed(network);
            for &i in batch {
                let (loss, gradients) = network.backward(&fit_inputs[i], &fit_targets[i]);
                epoch_loss_sum += loss;
                batch_gradients.accumulate(&gradients);
            }
            #[expect(clippy::cast_precision_loss)]
            batch_gradients.scale(1.0 / batch.len() as f64);
            adam.apply(config, network, &batch_gradients);
        }

        #[expect(clippy::cast_precision_loss)]
        let train_loss = epoch_loss_sum / fit_rows as f64;
        // with no holdout, early stopping monitors the training loss
        let validation_loss = if holdout == 0 {
            train_loss
        } else {
            mean_loss(network, val_inputs, val_targets)
        };

        let stats = EpochStats {
            epoch,
            train_loss,
            validation_loss,
        };
        on_epoch(&stats);
        history.push(stats);

        if validation_loss < best_loss - config.min_delta {
            best_loss = validation_loss;
            best_network = network.clone();
            epochs_without_improvement = 0;
        } else {
            epochs_without_improvement += 1;
            if epochs_without_improvement >= config.patience {
                break;
            }
        }
    }

    *network = best_network;
    Ok(TrainReport {
        epochs_run,
        best_validation_loss: best_loss,
        history,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    /// y = [x0 + x1, x0 - x1], learnable exactly by a small network.
    fn linear_dataset(rows: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut inputs = Vec::with_capacity(rows);
        let mut targets = Vec::with_capacity(rows);
        for _ in 0..rows {
            let x0: f64 = rng.random_range(-1.0..=1.0);
            let x1: f64 = rng.random_range(-1.0..=1.0);
            inputs.push(vec![x0, x1]);
            targets.push(vec![x0 + x1, x0 - x1]);
        }
        (inputs, targets)
    }

    #[test]
    fn test_loss_decreases_on_learnable_map() {
        let (inputs, targets) = linear_dataset(200);
        let mut rng = Pcg32::seed_from_u64(23);
        let mut network = DenseNetwork::random(2, &[16], 2, &mut rng);
        let config = TrainerConfig {
            max_epochs: 30,
            ..TrainerConfig::default()
        };

        let report = train(&config, &mut network, &inputs, &targets, &mut rng, |_| {}).unwrap();

        let first = report.history[0].train_loss;
        assert!(report.best_validation_loss < first / 2.0);
    }

    #[test]
    fn test_early_stopping_triggers() {
        let (inputs, targets) = linear_dataset(60);
        let mut rng = Pcg32::seed_from_u64(29);
        let mut network = DenseNetwork::random(2, &[8], 2, &mut rng);
        let config = TrainerConfig {
            max_epochs: 500,
            // any improvement below this huge delta counts as stalling
            min_delta: 1e9,
            patience: 3,
            ..TrainerConfig::default()
        };

        let report = train(&config, &mut network, &inputs, &targets, &mut rng, |_| {}).unwrap();
        // the first epoch always improves on infinity; patience counts
        // the three stalled epochs after it
        assert_eq!(report.epochs_run, 4);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let mut rng = Pcg32::seed_from_u64(31);
        let mut network = DenseNetwork::random(2, &[4], 1, &mut rng);
        let err = train(
            &TrainerConfig::default(),
            &mut network,
            &[],
            &[],
            &mut rng,
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(err, TrainError::EmptyDataset));
    }

    #[test]
    fn test_mismatched_lengths_fail() {
        let mut rng = Pcg32::seed_from_u64(37);
        let mut network = DenseNetwork::random(1, &[4], 1, &mut rng);
        let err = train(
            &TrainerConfig::default(),
            &mut network,
            &[vec![0.0], vec![1.0]],
            &[vec![0.0]],
            &mut rng,
            |_| {},
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TrainError::LengthMismatch {
                inputs: 2,
                targets: 1
            }
        ));
    }

    #[test]
    fn test_holdout_comes_from_the_tail() {
        // 10 rows, split 0.2 -> the last 2 rows are never trained on;
        // verify the trainer reports a validation loss computed on them
        let (inputs, targets) = linear_dataset(10);
        let mut rng = Pcg32::seed_from_u64(41);
        let mut network = DenseNetwork::random(2, &[4], 2, &mut rng);
        let config = TrainerConfig {
            max_epochs: 1,
            validation_split: 0.2,
            ..TrainerConfig::default()
        };

        let mut seen = Vec::new();
        train(&config, &mut network, &inputs, &targets, &mut rng, |s| {
            seen.push(*s);
        })
        .unwrap();

        let expected = mean_loss(&network, &inputs[8..], &targets[8..]);
        assert!((seen[0].validation_loss - expected).abs() < 1e-12);
    }
}
