//! Core types and settings for the compass heading engine

use core::time::Duration;

use nalgebra::Vector3;

/// Sensor accuracy reported alongside every sample
///
/// Mirrors the four-level status most platform sensor frameworks attach to
/// magnetometer readings. Only [`SensorAccuracy::Unreliable`] is treated
/// specially: such a reading is never considered a plausible magnetic field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorAccuracy {
    /// The sensor cannot be trusted (uncalibrated or in contact with interference)
    #[default]
    Unreliable,
    /// Low accuracy, calibration with the environment is needed
    Low,
    /// Average accuracy
    Medium,
    /// Maximum accuracy
    High,
}

impl SensorAccuracy {
    /// Whether readings with this accuracy may be used for plausibility checks
    pub fn is_reliable(self) -> bool {
        self != SensorAccuracy::Unreliable
    }
}

/// Kind of sensor a sample or subscription refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// 3-axis accelerometer (gravity vector, device frame)
    Accelerometer,
    /// 3-axis magnetometer (geomagnetic field vector, device frame)
    Magnetometer,
}

impl core::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SensorKind::Accelerometer => f.write_str("accelerometer"),
            SensorKind::Magnetometer => f.write_str("magnetometer"),
        }
    }
}

/// A single 3-axis reading in device-local coordinates
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::{SensorAccuracy, SensorSample};
///
/// let sample = SensorSample::new(Vector3::new(30.0, 0.0, -20.0), SensorAccuracy::High);
/// assert!((sample.norm() - 36.055).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    /// Raw vector as delivered by the sensor source
    pub vector: Vector3<f32>,
    /// Accuracy flag delivered with the vector
    pub accuracy: SensorAccuracy,
}

impl SensorSample {
    pub fn new(vector: Vector3<f32>, accuracy: SensorAccuracy) -> Self {
        Self { vector, accuracy }
    }

    /// Euclidean norm of the vector
    pub fn norm(&self) -> f32 {
        self.vector.norm()
    }
}

/// Operating mode of the calibration monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CalibrationMode {
    /// Field strength looks plausible, headings are trusted
    #[default]
    Normal,
    /// Field strength has been implausible for a while; the user is asked to calibrate
    Calibrating,
}

/// Compass engine settings
///
/// Controls the animation rate, the calibration debounce, the magnetic field
/// plausibility window and the cadence of the tick and location updates.
/// The defaults reproduce the behaviour of a stock phone compass screen.
///
/// # Example
/// ```
/// use core::time::Duration;
/// use compass_heading::CompassSettings;
///
/// let settings = CompassSettings {
///     tick_period: Duration::from_millis(40), // 25 Hz
///     max_rotate_degree: 2.0,                 // snappier needle
///     use_alternate_ordering: true,           // east/west glyph first
///     ..Default::default()
/// };
/// assert_eq!(settings.inaccurate_threshold, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompassSettings {
    /// Delay between the end of one tick and the start of the next
    pub tick_period: Duration,
    /// Maximum rotation applied per tick before easing, in degrees
    pub max_rotate_degree: f32,
    /// Easing input used while the needle is further than `max_rotate_degree` from target
    pub far_ease_input: f32,
    /// Easing input used once the needle is within `max_rotate_degree` of target
    pub near_ease_input: f32,
    /// Exponent factor of the accelerate curve, `f(t) = t^(2 * factor)`
    pub easing_factor: f32,
    /// Distance in degrees under which the needle snaps onto the target
    pub convergence_epsilon: f32,
    /// Lower bound of a plausible magnetic field norm (sensor units)
    pub min_field_strength: f32,
    /// Upper bound of a plausible magnetic field norm (sensor units)
    pub max_field_strength: f32,
    /// Consecutive plausible samples required to leave calibration mode
    pub accurate_threshold: u32,
    /// Consecutive implausible samples required to enter calibration mode
    pub inaccurate_threshold: u32,
    /// Place the east/west glyph before the north/south glyph in direction labels
    pub use_alternate_ordering: bool,
    /// Minimum time between location updates
    pub location_min_interval: Duration,
    /// Minimum distance between location updates, in metres
    pub location_min_distance_m: f32,
}

impl Default for CompassSettings {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(20),
            max_rotate_degree: 1.0,
            far_ease_input: 0.4,
            near_ease_input: 0.3,
            easing_factor: 1.0,
            convergence_epsilon: 0.001,
            min_field_strength: 25.0,
            max_field_strength: 65.0,
            accurate_threshold: 50,
            inaccurate_threshold: 50,
            use_alternate_ordering: false,
            location_min_interval: Duration::from_millis(2000),
            location_min_distance_m: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = CompassSettings::default();
        assert_eq!(settings.tick_period, Duration::from_millis(20));
        assert_eq!(settings.max_rotate_degree, 1.0);
        assert_eq!(settings.min_field_strength, 25.0);
        assert_eq!(settings.max_field_strength, 65.0);
        assert_eq!(settings.accurate_threshold, 50);
        assert_eq!(settings.inaccurate_threshold, 50);
        assert!(!settings.use_alternate_ordering);
    }

    #[test]
    fn test_accuracy_reliability() {
        assert!(!SensorAccuracy::Unreliable.is_reliable());
        assert!(SensorAccuracy::Low.is_reliable());
        assert!(SensorAccuracy::Medium.is_reliable());
        assert!(SensorAccuracy::High.is_reliable());
        assert_eq!(SensorAccuracy::default(), SensorAccuracy::Unreliable);
    }

    #[test]
    fn test_sensor_kind_display() {
        assert_eq!(SensorKind::Accelerometer.to_string(), "accelerometer");
        assert_eq!(SensorKind::Magnetometer.to_string(), "magnetometer");
    }
}
