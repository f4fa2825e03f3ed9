//! Fixed displacement stations for curve discretization.
//!
//! The stations are process-wide configuration: the same sequence must
//! be used when building the dataset, when generating training labels,
//! and when plotting predictions. Mixing two conventions shifts every
//! prediction against its ground truth at the affected station.

use serde::{Deserialize, Serialize};

/// Number of discretization stations, including the pinned origin.
pub const STATION_COUNT: usize = 7;

/// Number of response values per sample after the zero origin is
/// dropped.
pub const TARGET_COUNT: usize = STATION_COUNT - 1;

/// Ordered displacement stations in mm, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; STATION_COUNT]", into = "[f64; STATION_COUNT]")]
pub struct Stations([f64; STATION_COUNT]);

/// Malformed station sequence.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StationsError {
    #[display("station 0 must be 0, got {value}")]
    NonZeroOrigin { value: f64 },
    #[display("stations must be strictly increasing: station {index} is {value} after {previous}")]
    NotIncreasing {
        index: usize,
        value: f64,
        previous: f64,
    },
}

impl Stations {
    /// The reference stations of the shear-wall study, in mm.
    ///
    /// The final station is 19.5 mm everywhere; the 20 mm plotting
    /// convention of the original study is not used.
    #[must_use]
    pub const fn reference() -> Self {
        Self([0.0, 0.5, 1.0, 2.5, 5.0, 10.0, 19.5])
    }

    /// Validates that the sequence starts at 0 and is strictly
    /// increasing.
    pub fn new(values: [f64; STATION_COUNT]) -> Result<Self, StationsError> {
        if values[0] != 0.0 {
            return Err(StationsError::NonZeroOrigin { value: values[0] });
        }
        for i in 1..STATION_COUNT {
            if values[i] <= values[i - 1] {
                return Err(StationsError::NotIncreasing {
                    index: i,
                    value: values[i],
                    previous: values[i - 1],
                });
            }
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn values(&self) -> &[f64; STATION_COUNT] {
        &self.0
    }

    /// Stations after the pinned origin, one per stored response value.
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.0[1..]
    }

    /// The final station, in mm.
    #[must_use]
    pub fn last(&self) -> f64 {
        self.0[STATION_COUNT - 1]
    }
}

impl TryFrom<[f64; STATION_COUNT]> for Stations {
    type Error = StationsError;

    fn try_from(values: [f64; STATION_COUNT]) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<Stations> for [f64; STATION_COUNT] {
    fn from(stations: Stations) -> Self {
        stations.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_valid() {
        Stations::new(*Stations::reference().values()).unwrap();
        assert_eq!(Stations::reference().last(), 19.5);
    }

    #[test]
    fn test_nonzero_origin_rejected() {
        let err = Stations::new([0.5, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap_err();
        assert!(matches!(err, StationsError::NonZeroOrigin { value } if value == 0.5));
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let err = Stations::new([0.0, 1.0, 1.0, 3.0, 4.0, 5.0, 6.0]).unwrap_err();
        assert!(matches!(err, StationsError::NotIncreasing { index: 2, .. }));
    }
}
