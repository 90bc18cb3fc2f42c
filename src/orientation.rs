//! Orientation estimation from accelerometer and magnetometer samples
//!
//! Builds the rotation matrix between the device frame and an East-North-Up
//! world frame, then extracts the azimuth (rotation about the vertical axis).
//! The compass dial turns the opposite way to the device, so the target
//! heading is the negated azimuth.

use nalgebra::{Matrix3, Vector3};

use crate::error::OrientationError;
use crate::math::{RAD_TO_DEG, normalize_degrees};

/// Standard gravity used for the free-fall test, in m/s²
const GRAVITY: f32 = 9.81;

/// Gravity norms below 10% of g cannot define "down"
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * GRAVITY * GRAVITY;

/// Horizontal field vectors shorter than this are treated as degenerate
const MIN_HORIZONTAL_NORM: f32 = 0.1;

/// Compute the device-to-world rotation matrix
///
/// Rows of the returned matrix are the world East, North and Up axes
/// expressed in device coordinates. Fails when the gravity vector is too
/// short or when the magnetic field is (nearly) parallel to gravity.
///
/// # Arguments
/// * `gravity` - Accelerometer reading in m/s² (device frame)
/// * `geomagnetic` - Magnetometer reading in µT (device frame)
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::orientation::rotation_matrix;
///
/// let r = rotation_matrix(Vector3::new(0.0, 0.0, 9.81), Vector3::new(0.0, 30.0, -20.0)).unwrap();
/// assert!((r.determinant() - 1.0).abs() < 1e-5);
/// ```
pub fn rotation_matrix(
    gravity: Vector3<f32>,
    geomagnetic: Vector3<f32>,
) -> Result<Matrix3<f32>, OrientationError> {
    let norm_squared = gravity.norm_squared();
    if norm_squared < FREE_FALL_GRAVITY_SQUARED {
        return Err(OrientationError::FreeFall { norm_squared });
    }

    // East: perpendicular to both the field and gravity
    let east = geomagnetic.cross(&gravity);
    let horizontal_norm = east.norm();
    if horizontal_norm < MIN_HORIZONTAL_NORM {
        return Err(OrientationError::Degenerate { horizontal_norm });
    }
    let east = east / horizontal_norm;
    let up = gravity / norm_squared.sqrt();

    // North completes the right-handed frame
    let north = up.cross(&east);

    Ok(Matrix3::new(
        east.x, east.y, east.z, //
        north.x, north.y, north.z, //
        up.x, up.y, up.z,
    ))
}

/// Azimuth of the device Y axis in radians, measured clockwise from magnetic north
///
/// Range: -π to +π.
pub fn azimuth(rotation: &Matrix3<f32>) -> f32 {
    rotation[(0, 1)].atan2(rotation[(1, 1)])
}

/// Compute the compass target heading in degrees, `[0, 360)`
///
/// The dial rotates against the device, so this is the negated azimuth,
/// normalized.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use compass_heading::orientation::target_heading;
///
/// // Device Y axis pointing east: the dial turns back by 90°
/// let heading = target_heading(Vector3::new(0.0, 0.0, 9.81), Vector3::new(-30.0, 0.0, -20.0)).unwrap();
/// assert!((heading - 270.0).abs() < 1e-3);
/// ```
pub fn target_heading(
    accelerometer: Vector3<f32>,
    magnetometer: Vector3<f32>,
) -> Result<f32, OrientationError> {
    let rotation = rotation_matrix(accelerometer, magnetometer)?;
    let degrees = azimuth(&rotation) * RAD_TO_DEG;
    Ok(normalize_degrees(-degrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::DEG_TO_RAD;
    use nalgebra::Rotation3;

    fn level() -> Vector3<f32> {
        Vector3::new(0.0, 0.0, 9.81)
    }

    /// Field seen by a level device whose Y axis points at `azimuth_deg`
    fn level_field(azimuth_deg: f32) -> Vector3<f32> {
        let a = azimuth_deg * DEG_TO_RAD;
        Vector3::new(-30.0 * a.sin(), 30.0 * a.cos(), -20.0)
    }

    fn angle_diff(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn test_cardinal_azimuths() {
        for (azimuth_deg, expected_target) in [(0.0, 0.0), (90.0, 270.0), (180.0, 180.0), (270.0, 90.0)] {
            let heading = target_heading(level(), level_field(azimuth_deg)).unwrap();
            assert!(
                angle_diff(heading, expected_target) < 1e-3,
                "azimuth {}° should give target {}°, got {}",
                azimuth_deg,
                expected_target,
                heading
            );
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Field along device X: device Y points west, dial turns +90°
        let heading = target_heading(Vector3::new(0.0, 0.0, 10.0), Vector3::new(30.0, 0.0, 0.0)).unwrap();
        assert!((heading - 90.0).abs() < 1e-4, "got {}", heading);
    }

    #[test]
    fn test_rotation_matrix_is_orthonormal() {
        let r = rotation_matrix(Vector3::new(0.5, 1.2, 9.6), Vector3::new(12.0, 25.0, -31.0)).unwrap();
        let identity = r * r.transpose();
        assert!((identity - Matrix3::identity()).norm() < 1e-5);
        assert!((r.determinant() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tilt_compensation() {
        for azimuth_deg in [0.0f32, 30.0, 135.0, 250.0] {
            let level_heading = target_heading(level(), level_field(azimuth_deg)).unwrap();

            // Pitch the device about its own X axis
            let pitch = Rotation3::from_axis_angle(&Vector3::x_axis(), 0.35);
            let tilted_heading = target_heading(pitch * level(), pitch * level_field(azimuth_deg)).unwrap();

            assert!(
                angle_diff(level_heading, tilted_heading) < 0.01,
                "Tilt compensation failed: level={:.3}°, tilted={:.3}°",
                level_heading,
                tilted_heading
            );
        }
    }

    #[test]
    fn test_free_fall_is_rejected() {
        let result = target_heading(Vector3::new(0.0, 0.0, 0.5), level_field(0.0));
        assert!(matches!(result, Err(OrientationError::FreeFall { .. })));

        let result = target_heading(Vector3::zeros(), level_field(0.0));
        assert!(matches!(result, Err(OrientationError::FreeFall { .. })));
    }

    #[test]
    fn test_degenerate_field_is_rejected() {
        // Zero field
        let result = target_heading(level(), Vector3::zeros());
        assert!(matches!(result, Err(OrientationError::Degenerate { .. })));

        // Field parallel to gravity
        let result = target_heading(level(), Vector3::new(0.0, 0.0, -40.0));
        assert!(matches!(result, Err(OrientationError::Degenerate { .. })));
    }

    #[test]
    fn test_heading_range() {
        for azimuth_deg in (0..360).step_by(15) {
            let heading = target_heading(level(), level_field(azimuth_deg as f32)).unwrap();
            assert!(
                (0.0..360.0).contains(&heading),
                "Heading {:.1}° out of range for azimuth {}°",
                heading,
                azimuth_deg
            );
        }
    }
}
