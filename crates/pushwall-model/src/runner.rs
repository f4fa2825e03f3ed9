//! Contract with the external structural-analysis engine.
//!
//! The engine is a black box that performs one incremental nonlinear
//! static pushover analysis per request. It is not safe for concurrent
//! invocation (it mutates global simulation state), so the trait takes
//! `&mut self` and the batch pipeline drives it strictly one analysis at
//! a time. Throughput scaling happens across processes, each owning a
//! private runner and a private raw-store shard.
//!
//! [`CommandRunner`] is the reference adapter: it spawns the engine as a
//! child process per analysis, writes one JSON request to its stdin and
//! reads one JSON response from its stdout. Running the engine in an
//! isolated child keeps cancellation simple (kill the child, the parent
//! engine state is untouched) and a crash of the engine cannot corrupt
//! this process.

use std::{
    io::{self, Write as _},
    path::PathBuf,
    process::{Command, ExitStatus, Stdio},
};

use serde::{Deserialize, Serialize};

use crate::{
    curve::{CurveLengthError, PushoverCurve},
    params::WallParams,
};

/// Element counts of the finite-element mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshConfig {
    /// Total elements across the wall length.
    pub horizontal: u32,
    /// Elements of the horizontal count used for each boundary element.
    pub boundary: u32,
    /// Elements over the wall height.
    pub vertical: u32,
}

impl MeshConfig {
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            horizontal: 8,
            boundary: 2,
            vertical: 10,
        }
    }
}

/// Displacement control of the pushover analysis, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Lateral displacement the analysis pushes towards.
    pub target_displacement: f64,
    /// Displacement increment per analysis step.
    pub increment: f64,
}

impl AnalysisConfig {
    #[must_use]
    pub const fn reference() -> Self {
        Self {
            target_displacement: 20.0,
            increment: 0.1,
        }
    }
}

/// One pushover analysis per call.
///
/// Solver non-convergence is not an error: the engine returns the curve
/// up to the last converged step, and the caller decides whether the
/// partial curve is usable. [`RunnerError`] covers transport problems
/// only.
pub trait PushoverRunner {
    fn run(
        &mut self,
        params: &WallParams,
        mesh: &MeshConfig,
        analysis: &AnalysisConfig,
    ) -> Result<PushoverCurve, RunnerError>;
}

/// Transport failure while talking to the engine process.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum RunnerError {
    #[display("failed to launch engine command: {_0}")]
    Spawn(io::Error),
    #[display("failed to exchange data with engine: {_0}")]
    Io(io::Error),
    #[display("engine exited with {status}")]
    EngineFailed {
        #[error(not(source))]
        status: ExitStatus,
    },
    #[display("engine response is not valid JSON: {_0}")]
    MalformedResponse(serde_json::Error),
    #[display("engine returned mismatched series: {_0}")]
    Response(CurveLengthError),
}

#[derive(Debug, Serialize)]
struct AnalysisRequest<'a> {
    params: &'a WallParams,
    mesh: &'a MeshConfig,
    analysis: &'a AnalysisConfig,
}

#[derive(Debug, Deserialize)]
struct AnalysisResponse {
    displacement: Vec<f64>,
    base_shear: Vec<f64>,
}

/// Runs the engine as a child process, one process per analysis.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandRunner {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl PushoverRunner for CommandRunner {
    fn run(
        &mut self,
        params: &WallParams,
        mesh: &MeshConfig,
        analysis: &AnalysisConfig,
    ) -> Result<PushoverCurve, RunnerError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(RunnerError::Spawn)?;

        let request = AnalysisRequest {
            params,
            mesh,
            analysis,
        };
        // stdin is piped above, so take() cannot return None
        if let Some(mut stdin) = child.stdin.take() {
            let body = serde_json::to_vec(&request).map_err(RunnerError::MalformedResponse)?;
            stdin.write_all(&body).map_err(RunnerError::Io)?;
        }

        let output = child.wait_with_output().map_err(RunnerError::Io)?;
        if !output.status.success() {
            return Err(RunnerError::EngineFailed {
                status: output.status,
            });
        }

        let response: AnalysisResponse =
            serde_json::from_slice(&output.stdout).map_err(RunnerError::MalformedResponse)?;
        PushoverCurve::new(response.displacement, response.base_shear)
            .map_err(RunnerError::Response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamBounds;

    #[test]
    fn test_request_wire_format() {
        let request = AnalysisRequest {
            params: &ParamBounds::reference().mins,
            mesh: &MeshConfig::reference(),
            analysis: &AnalysisConfig::reference(),
        };
        let json: serde_json::Value = serde_json::from_str(
            &serde_json::to_string(&request).unwrap(),
        )
        .unwrap();
        assert_eq!(json["mesh"]["horizontal"], 8);
        assert_eq!(json["analysis"]["target_displacement"], 20.0);
        assert_eq!(json["params"]["thickness"], 0.125);
    }

    #[test]
    fn test_response_wire_format() {
        let response: AnalysisResponse =
            serde_json::from_str(r#"{"displacement":[0.0,0.1],"base_shear":[0.0,12.5]}"#).unwrap();
        assert_eq!(response.displacement, vec![0.0, 0.1]);
        assert_eq!(response.base_shear, vec![0.0, 12.5]);
    }

    #[test]
    fn test_missing_engine_is_a_spawn_error() {
        let mut runner = CommandRunner::new("/nonexistent/pushwall-engine", vec![]);
        let err = runner
            .run(
                &ParamBounds::reference().mins,
                &MeshConfig::reference(),
                &AnalysisConfig::reference(),
            )
            .unwrap_err();
        assert!(matches!(err, RunnerError::Spawn(_)));
    }
}
