//! Persisted surrogate model artifact.
//!
//! The trained network and the normalization bounds it was trained
//! against always travel together: the network's domain is the
//! normalized input space, so predicting with different bounds silently
//! corrupts every output. The artifact is one JSON object on durable
//! storage, written once by a training run and loaded read-only by
//! every consumer.

use std::io;

use chrono::{DateTime, Utc};
use pushwall_dataset::{STATION_COUNT, Stations, TARGET_COUNT};
use pushwall_model::WallParams;
use serde::{Deserialize, Serialize};

use crate::{network::DenseNetwork, normalize::NormBounds};

/// Summary of the training run that produced an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub best_validation_loss: f64,
}

/// Failure loading or saving a model artifact.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ArtifactError {
    #[display("failed to encode or decode model artifact: {_0}")]
    Json(serde_json::Error),
    #[display(
        "artifact bounds fingerprint mismatch: stored {stored:#018x}, computed {computed:#018x}"
    )]
    FingerprintMismatch { stored: u64, computed: u64 },
    #[display(
        "artifact network has wrong dimensions: {inputs} inputs x {outputs} outputs"
    )]
    WrongDimensions { inputs: usize, outputs: usize },
}

/// A trained surrogate: the network plus everything needed to call it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrogateModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub stations: Stations,
    pub bounds: NormBounds,
    pub bounds_fingerprint: u64,
    pub hidden_layers: Vec<usize>,
    pub network: DenseNetwork,
    pub training: TrainingSummary,
}

impl SurrogateModel {
    /// Assembles an artifact from a finished training run, stamping the
    /// current time and the bounds fingerprint.
    #[must_use]
    pub fn new(
        name: String,
        stations: Stations,
        bounds: NormBounds,
        network: DenseNetwork,
        training: TrainingSummary,
    ) -> Self {
        Self {
            name,
            trained_at: Utc::now(),
            stations,
            bounds_fingerprint: bounds.fingerprint(),
            hidden_layers: network.hidden_dims(),
            bounds,
            network,
            training,
        }
    }

    /// Verifies internal consistency: the stored fingerprint matches
    /// the stored bounds, and the network has the expected shape.
    pub fn verify(&self) -> Result<(), ArtifactError> {
        let computed = self.bounds.fingerprint();
        if computed != self.bounds_fingerprint {
            return Err(ArtifactError::FingerprintMismatch {
                stored: self.bounds_fingerprint,
                computed,
            });
        }
        if self.network.input_dim() != self.bounds.mins().len()
            || self.network.output_dim() != TARGET_COUNT
        {
            return Err(ArtifactError::WrongDimensions {
                inputs: self.network.input_dim(),
                outputs: self.network.output_dim(),
            });
        }
        Ok(())
    }

    /// Loads and verifies an artifact.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, ArtifactError> {
        let model: Self = serde_json::from_reader(reader).map_err(ArtifactError::Json)?;
        model.verify()?;
        Ok(model)
    }

    /// Serializes the artifact as pretty-printed JSON.
    pub fn to_writer<W: io::Write>(&self, writer: W) -> Result<(), ArtifactError> {
        serde_json::to_writer_pretty(writer, self).map_err(ArtifactError::Json)
    }

    /// Predicts the 6 base-shear values (kN) at the stations past the
    /// origin.
    #[must_use]
    pub fn predict(&self, params: &WallParams) -> [f64; TARGET_COUNT] {
        let normalized = self.bounds.normalize_params(params);
        let output = self.network.forward(&normalized);
        let mut values = [0.0; TARGET_COUNT];
        values.copy_from_slice(&output);
        values
    }

    /// Full predicted station curve as (displacement mm, base shear kN)
    /// pairs, with the pinned (0, 0) origin.
    #[must_use]
    pub fn predict_curve(&self, params: &WallParams) -> [(f64, f64); STATION_COUNT] {
        let prediction = self.predict(params);
        let mut curve = [(0.0, 0.0); STATION_COUNT];
        for (i, &station) in self.stations.values().iter().enumerate().skip(1) {
            curve[i] = (station, prediction[i - 1]);
        }
        curve
    }
}
