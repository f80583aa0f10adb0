//! Measurement lifecycle, movement and perception-type families

coded_enum! {
    /// Lifecycle state of a tracked object's measurement in a given frame
    MeasState, sentinel = Unknown {
        Unknown = 0 => "UNKNOWN",
        Deleted = 1 => "DELETED",
        NewObject = 2 => "NEW_OBJECT",
        Measured = 3 => "MEASURED",
        Predicted = 4 => "PREDICTED",
        DeletedFromMerge = 5 => "DELETED_FROM_MERGE",
        NewFromMerge = 6 => "NEW_FROM_MERGE",
    }
}

coded_enum! {
    /// Movement state reported by the sensor for an object
    ///
    /// `NO_INFO` means the sensor did not provide the field; `UNKNOWN` means it
    /// did, but could not decide.
    MovementClassification, sentinel = NoInfo {
        NoInfo = 0 => "NO_INFO",
        Unknown = 1 => "UNKNOWN",
        Moving = 2 => "MOVING",
        Stationary = 3 => "STATIONARY",
        Oncoming = 4 => "ONCOMING",
        CrossingMoving = 5 => "CROSSING_MOVING",
        CrossingStationary = 6 => "CROSSING_STATIONARY",
        Stopped = 7 => "STOPPED",
    }
}

coded_enum! {
    /// How a perception value came to be
    PerceptionType, sentinel = NotProvided {
        NotProvided = 0 => "NOT_PROVIDED",
        /// Reported directly by the sensor
        Measured = 1 => "MEASURED",
        /// Derived from other measurements
        Determined = 2 => "DETERMINED",
    }
}

impl MeasState {
    /// Whether the object no longer exists after this frame
    pub fn is_deleted(self) -> bool {
        matches!(self, MeasState::Deleted | MeasState::DeletedFromMerge)
    }

    /// Whether this frame is the first one for the object
    pub fn is_new(self) -> bool {
        matches!(self, MeasState::NewObject | MeasState::NewFromMerge)
    }
}

impl MovementClassification {
    /// Whether the sensor says the object is currently moving
    pub fn is_moving(self) -> bool {
        matches!(
            self,
            MovementClassification::Moving
                | MovementClassification::Oncoming
                | MovementClassification::CrossingMoving
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CodedEnum;

    #[test]
    fn test_meas_state_codes() {
        assert_eq!(MeasState::NewFromMerge.code(), 6);
        assert_eq!(MeasState::from_code(3).unwrap(), MeasState::Measured);
        assert_eq!("PREDICTED".parse::<MeasState>().unwrap(), MeasState::Predicted);
        assert!("predicted".parse::<MeasState>().is_err());
    }

    #[test]
    fn test_meas_state_lifecycle() {
        assert!(MeasState::DeletedFromMerge.is_deleted());
        assert!(MeasState::NewObject.is_new());
        assert!(!MeasState::Measured.is_new());
        assert!(!MeasState::Measured.is_deleted());
    }

    #[test]
    fn test_movement_unknown_is_not_sentinel() {
        assert_eq!(MovementClassification::default(), MovementClassification::NoInfo);
        assert_eq!(MovementClassification::Unknown.code(), 1);
        assert_eq!(
            MovementClassification::from_code_lenient(99).unwrap(),
            MovementClassification::NoInfo
        );
    }

    #[test]
    fn test_movement_is_moving() {
        assert!(MovementClassification::CrossingMoving.is_moving());
        assert!(!MovementClassification::Stopped.is_moving());
        assert!(!MovementClassification::CrossingStationary.is_moving());
    }

    #[test]
    fn test_perception_type_display() {
        assert_eq!(PerceptionType::Determined.to_string(), "DETERMINED");
        assert_eq!(PerceptionType::default(), PerceptionType::NotProvided);
    }
}
