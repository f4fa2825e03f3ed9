//! Dense feed-forward network: ReLU hidden layers, linear output.
//!
//! The network maps normalized 11-dimensional inputs to 6 base-shear
//! values in physical units. Weights are He-initialized (zero-mean
//! normal with variance 2 / fan-in), biases start at zero. Backward
//! passes compute gradients of the per-sample MSE loss; the optimizer
//! itself lives in the training crate.

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// One fully connected layer. Weights are row-major: row `j` holds the
/// incoming weights of output unit `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub inputs: usize,
    pub outputs: usize,
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    fn random<R>(inputs: usize, outputs: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let sigma = (2.0 / inputs as f64).sqrt();
        let normal = Normal::new(0.0, sigma).unwrap();
        let weights = (0..inputs * outputs).map(|_| rng.sample(normal)).collect();
        Self {
            inputs,
            outputs,
            weights,
            biases: vec![0.0; outputs],
        }
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        debug_assert_eq!(input.len(), self.inputs);
        let mut out = self.biases.clone();
        for (j, value) in out.iter_mut().enumerate() {
            let row = &self.weights[j * self.inputs..(j + 1) * self.inputs];
            *value += row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>();
        }
        out
    }
}

/// Gradients matching one [`DenseLayer`]'s parameter layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Vec<f64>,
    pub biases: Vec<f64>,
}

/// Gradients matching a whole [`DenseNetwork`].
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGradients {
    pub layers: Vec<LayerGradients>,
}

impl NetworkGradients {
    #[must_use]
    pub fn zeroed(network: &DenseNetwork) -> Self {
        Self {
            layers: network
                .layers
                .iter()
                .map(|layer| LayerGradients {
                    weights: vec![0.0; layer.weights.len()],
                    biases: vec![0.0; layer.biases.len()],
                })
                .collect(),
        }
    }

    /// Adds `other` element-wise.
    pub fn accumulate(&mut self, other: &NetworkGradients) {
        for (mine, theirs) in self.layers.iter_mut().zip(&other.layers) {
            for (a, b) in mine.weights.iter_mut().zip(&theirs.weights) {
                *a += b;
            }
            for (a, b) in mine.biases.iter_mut().zip(&theirs.biases) {
                *a += b;
            }
        }
    }

    /// Multiplies every gradient by `factor` (used to average a batch).
    pub fn scale(&mut self, factor: f64) {
        for layer in &mut self.layers {
            for g in layer.weights.iter_mut().chain(&mut layer.biases) {
                *g *= factor;
            }
        }
    }
}

/// A stack of dense layers with ReLU hidden activations and a linear
/// output layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseNetwork {
    layers: Vec<DenseLayer>,
}

impl DenseNetwork {
    /// Builds a He-initialized network `input_dim -> hidden... ->
    /// output_dim`.
    #[must_use]
    pub fn random<R>(input_dim: usize, hidden: &[usize], output_dim: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut layers = Vec::with_capacity(hidden.len() + 1);
        let mut previous = input_dim;
        for &width in hidden {
            layers.push(DenseLayer::random(previous, width, rng));
            previous = width;
        }
        layers.push(DenseLayer::random(previous, output_dim, rng));
        Self { layers }
    }

    #[must_use]
    pub fn input_dim(&self) -> usize {
        self.layers[0].inputs
    }

    #[must_use]
    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].outputs
    }

    /// Widths of the hidden layers, in order.
    #[must_use]
    pub fn hidden_dims(&self) -> Vec<usize> {
        self.layers[..self.layers.len() - 1]
            .iter()
            .map(|layer| layer.outputs)
            .collect()
    }

    #[must_use]
    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [DenseLayer] {
        &mut self.layers
    }

    /// Runs a forward pass.
    #[must_use]
    pub fn forward(&self, input: &[f64]) -> Vec<f64> {
        let last = self.layers.len() - 1;
        let mut activation = input.to_vec();
        for (l, layer) in self.layers.iter().enumerate() {
            let mut out = layer.forward(&activation);
            if l != last {
                for v in &mut out {
                    *v = v.max(0.0);
                }
            }
            activation = out;
        }
        activation
    }

    /// Per-sample MSE loss (mean over outputs) for a given target.
    #[must_use]
    pub fn loss(&self, input: &[f64], target: &[f64]) -> f64 {
        mse(&self.forward(input), target)
    }

    /// Backward pass for one sample: returns the MSE loss and the
    /// gradients of every parameter with respect to it.
    #[must_use]
    pub fn backward(&self, input: &[f64], target: &[f64]) -> (f64, NetworkGradients) {
        let last = self.layers.len() - 1;

        // forward pass, keeping each layer's post-activation output
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.to_vec());
        for (l, layer) in self.layers.iter().enumerate() {
            let mut out = layer.forward(&activations[l]);
            if l != last {
                for v in &mut out {
                    *v = v.max(0.0);
                }
            }
            activations.push(out);
        }

        let prediction = &activations[self.layers.len()];
        let loss = mse(prediction, target);

        // output delta for MSE with a linear output layer
        #[expect(clippy::cast_precision_loss)]
        let scale = 2.0 / target.len() as f64;
        let mut delta: Vec<f64> = prediction
            .iter()
            .zip(target)
            .map(|(p, t)| scale * (p - t))
            .collect();

        let mut gradients = NetworkGradients::zeroed(self);
        for l in (0..self.layers.len()).rev() {
            let layer = &self.layers[l];
            let input_activation = &activations[l];
            let grads = &mut gradients.layers[l];
            for j in 0..layer.outputs {
                grads.biases[j] = delta[j];
                let row = &mut grads.weights[j * layer.inputs..(j + 1) * layer.inputs];
                for (g, a) in row.iter_mut().zip(input_activation) {
                    *g = delta[j] * a;
                }
            }

            if l > 0 {
                // propagate through the weights, then gate by the ReLU
                // of the previous layer (post-activation > 0 iff the
                // unit was active)
                let mut next = vec![0.0; layer.inputs];
                for j in 0..layer.outputs {
                    let row = &layer.weights[j * layer.inputs..(j + 1) * layer.inputs];
                    for (n, w) in next.iter_mut().zip(row) {
                        *n += delta[j] * w;
                    }
                }
                for (n, a) in next.iter_mut().zip(input_activation) {
                    if *a <= 0.0 {
                        *n = 0.0;
                    }
                }
                delta = next;
            }
        }

        (loss, gradients)
    }
}

fn mse(prediction: &[f64], target: &[f64]) -> f64 {
    debug_assert_eq!(prediction.len(), target.len());
    #[expect(clippy::cast_precision_loss)]
    let n = target.len() as f64;
    prediction
        .iter()
        .zip(target)
        .map(|(p, t)| (p - t) * (p - t))
        .sum::<f64>()
        / n
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_layer_dimensions() {
        let mut rng = Pcg32::seed_from_u64(1);
        let network = DenseNetwork::random(11, &[200, 200, 200], 6, &mut rng);
        assert_eq!(network.input_dim(), 11);
        assert_eq!(network.output_dim(), 6);
        assert_eq!(network.hidden_dims(), vec![200, 200, 200]);
        assert_eq!(network.forward(&[0.5; 11]).len(), 6);
    }

    #[test]
    fn test_hand_built_forward() {
        // y0 = relu(x0 - x1), y1 = relu(x1); output = y0 + 2*y1 + 0.5
        let network = DenseNetwork {
            layers: vec![
                DenseLayer {
                    inputs: 2,
                    outputs: 2,
                    weights: vec![1.0, -1.0, 0.0, 1.0],
                    biases: vec![0.0, 0.0],
                },
                DenseLayer {
                    inputs: 2,
                    outputs: 1,
                    weights: vec![1.0, 2.0],
                    biases: vec![0.5],
                },
            ],
        };
        assert_eq!(network.forward(&[3.0, 1.0]), vec![2.0 + 2.0 + 0.5]);
        // first hidden unit clipped at zero
        assert_eq!(network.forward(&[1.0, 3.0]), vec![0.0 + 6.0 + 0.5]);
    }

    #[test]
    fn test_backward_matches_numeric_gradients() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut network = DenseNetwork::random(3, &[5, 4], 2, &mut rng);
        let input = [0.3, -0.7, 0.9];
        let target = [1.0, -0.5];

        let (_, gradients) = network.backward(&input, &target);

        let epsilon = 1e-6;
        for l in 0..network.layers.len() {
            for k in 0..network.layers[l].weights.len() {
                let original = network.layers[l].weights[k];
                network.layers_mut()[l].weights[k] = original + epsilon;
                let plus = network.loss(&input, &target);
                network.layers_mut()[l].weights[k] = original - epsilon;
                let minus = network.loss(&input, &target);
                network.layers_mut()[l].weights[k] = original;

                let numeric = (plus - minus) / (2.0 * epsilon);
                let analytic = gradients.layers[l].weights[k];
                assert!(
                    (numeric - analytic).abs() < 1e-5,
                    "layer {l} weight {k}: numeric {numeric}, analytic {analytic}"
                );
            }
        }
    }

    #[test]
    fn test_gradient_accumulate_and_scale() {
        let mut rng = Pcg32::seed_from_u64(5);
        let network = DenseNetwork::random(2, &[3], 1, &mut rng);
        let (_, a) = network.backward(&[1.0, 2.0], &[0.5]);
        let mut sum = NetworkGradients::zeroed(&network);
        sum.accumulate(&a);
        sum.accumulate(&a);
        sum.scale(0.5);
        for (s, g) in sum.layers.iter().zip(&a.layers) {
            for (x, y) in s.weights.iter().zip(&g.weights) {
                assert!((x - y).abs() < 1e-12);
            }
        }
    }
}
