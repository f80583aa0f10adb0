//! Sensor modality and tracking-point families

coded_enum! {
    /// Sensor that produced an object list
    ///
    /// There is no zero code and no "unknown" value: a modality is always
    /// known to the producer.
    SensorModality {
        Lidar = 1 => "LIDAR",
        Camera = 2 => "CAMERA",
        /// Short-range radar
        RadarSr = 3 => "RADAR_SR",
        /// Mid-range radar
        RadarMr = 4 => "RADAR_MR",
        /// Long-range radar
        RadarLr = 5 => "RADAR_LR",
        Fusion = 6 => "FUSION",
    }
}

coded_enum! {
    /// Point on the object's bounding box that its position refers to
    TrackingPoint, sentinel = Unknown {
        Unknown = 0 => "UNKNOWN",
        FrontRightCorner = 1 => "FRONT_RIGHT_CORNER",
        CenterOfFrontEdge = 2 => "CENTER_OF_FRONT_EDGE",
        FrontLeftCorner = 3 => "FRONT_LEFT_CORNER",
        CenterOfLeftEdge = 4 => "CENTER_OF_LEFT_EDGE",
        CenterOfVehicle = 5 => "CENTER_OF_VEHICLE",
        CenterOfRightEdge = 6 => "CENTER_OF_RIGHT_EDGE",
        RearLeftCorner = 7 => "REAR_LEFT_CORNER",
        CenterOfRearEdge = 8 => "CENTER_OF_REAR_EDGE",
        RearRightCorner = 9 => "REAR_RIGHT_CORNER",
    }
}

impl SensorModality {
    pub fn is_radar(self) -> bool {
        matches!(
            self,
            SensorModality::RadarSr | SensorModality::RadarMr | SensorModality::RadarLr
        )
    }
}

impl TrackingPoint {
    /// Offset of the tracking point from the box center, as fractions of
    /// `(length, width)`. Longitudinal is positive forward, lateral positive left.
    ///
    /// `None` for `UNKNOWN`.
    pub fn box_offset(self) -> Option<(f64, f64)> {
        let offset = match self {
            TrackingPoint::Unknown => return None,
            TrackingPoint::FrontRightCorner => (0.5, -0.5),
            TrackingPoint::CenterOfFrontEdge => (0.5, 0.0),
            TrackingPoint::FrontLeftCorner => (0.5, 0.5),
            TrackingPoint::CenterOfLeftEdge => (0.0, 0.5),
            TrackingPoint::CenterOfVehicle => (0.0, 0.0),
            TrackingPoint::CenterOfRightEdge => (0.0, -0.5),
            TrackingPoint::RearLeftCorner => (-0.5, 0.5),
            TrackingPoint::CenterOfRearEdge => (-0.5, 0.0),
            TrackingPoint::RearRightCorner => (-0.5, -0.5),
        };
        Some(offset)
    }
}
