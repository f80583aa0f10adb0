//! Object classification family
//!
//! Besides the enum itself this module carries the per-object classification
//! track (one class and one confidence per timestep) and the default box
//! dimensions used when a sensor does not report them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, SchemaError};

coded_enum! {
    /// Object class reported by the sensor
    ///
    /// Codes 6..=10 are unassigned. They were never published and must not be
    /// given to a new class with a different meaning.
    ObjectClassification, sentinel = NoInfo {
        NoInfo = 0 => "NO_INFO",
        Car = 1 => "CAR",
        Truck = 2 => "TRUCK",
        Motorcycle = 3 => "MOTORCYCLE",
        Pedestrian = 4 => "PEDESTRIAN",
        Bicycle = 5 => "BICYCLE",
        BiggerThanCar = 11 => "BIGGER_THAN_CAR",
        SmallerThanCar = 12 => "SMALLER_THAN_CAR",
        UnknownSmall = 13 => "UNKNOWN_SMALL",
        UnknownBig = 14 => "UNKNOWN_BIG",
        Unknown = 15 => "UNKNOWN",
    }
}

/// Box dimensions in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self { length, width, height }
    }
}

impl ObjectClassification {
    pub fn is_vehicle(self) -> bool {
        matches!(
            self,
            ObjectClassification::Car
                | ObjectClassification::Truck
                | ObjectClassification::Motorcycle
                | ObjectClassification::BiggerThanCar
        )
    }

    /// Pedestrians and cyclists
    pub fn is_vulnerable_road_user(self) -> bool {
        matches!(self, ObjectClassification::Pedestrian | ObjectClassification::Bicycle)
    }

    /// Default dimensions to assume when the sensor does not report any
    pub fn default_dimensions(self) -> Option<Dimensions> {
        match self {
            ObjectClassification::Pedestrian => Some(Dimensions::new(0.4, 0.53, 1.9)),
            ObjectClassification::Bicycle => Some(Dimensions::new(1.70, 0.7, 1.9)),
            _ => None,
        }
    }
}

/// Classification of one object over its lifetime
///
/// `val[i]` and `confidence[i]` describe the same timestep. An empty
/// confidence array is allowed when confidences were not provided.
/// Deserialization runs the same validation as [`ClassificationTrack::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawClassificationTrack")]
pub struct ClassificationTrack {
    pub val: Vec<ObjectClassification>,
    pub confidence: Vec<f64>,
}

#[derive(Deserialize)]
struct RawClassificationTrack {
    #[serde(default)]
    val: Vec<ObjectClassification>,
    #[serde(default)]
    confidence: Vec<f64>,
}

impl TryFrom<RawClassificationTrack> for ClassificationTrack {
    type Error = SchemaError;

    fn try_from(raw: RawClassificationTrack) -> Result<Self> {
        Self::new(raw.val, raw.confidence)
    }
}

impl ClassificationTrack {
    /// Create a track, validating the confidence values
    pub fn new(val: Vec<ObjectClassification>, confidence: Vec<f64>) -> Result<Self> {
        let track = Self { val, confidence };
        track.validate()?;
        Ok(track)
    }

    /// Check that every confidence lies in `[0, 1]`.
    ///
    /// A length mismatch between classes and confidences is only logged.
    pub fn validate(&self) -> Result<()> {
        if let Some(bad) = self.confidence.iter().find(|c| !(0.0..=1.0).contains(*c)) {
            return Err(SchemaError::InvalidValue(format!(
                "confidence value should be between 0 and 1, but is {}",
                bad
            )));
        }

        if !self.confidence.is_empty() && self.confidence.len() != self.val.len() {
            warn!(
                classes = self.val.len(),
                confidences = self.confidence.len(),
                "confidence array length does not match classification array length"
            );
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }

    /// Class with the highest confidence over the whole track.
    ///
    /// Falls back to the most recent class when confidences are missing.
    pub fn most_confident(&self) -> Option<ObjectClassification> {
        if self.confidence.len() != self.val.len() {
            return self.val.last().copied();
        }

        self.val
            .iter()
            .zip(&self.confidence)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(class, _)| *class)
    }

    /// Restrict the track to the inclusive timestep range `birth..=death`,
    /// relative to the object's own first timestep.
    pub fn cut_to_timespan(&mut self, birth: usize, death: usize) -> Result<()> {
        if birth > death {
            return Err(SchemaError::InvalidValue(format!(
                "birth {} is after death {}",
                birth, death
            )));
        }

        for (what, len) in [("classification", self.val.len()), ("confidence", self.confidence.len())] {
            if len != 0 && death >= len {
                return Err(SchemaError::InvalidValue(format!(
                    "death {} is outside a {} track of length {}",
                    death, what, len
                )));
            }
        }

        if !self.val.is_empty() {
            self.val = self.val[birth..=death].to_vec();
        }
        if !self.confidence.is_empty() {
            self.confidence = self.confidence[birth..=death].to_vec();
        }

        Ok(())
    }
}
