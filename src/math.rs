//! Angle arithmetic for the compass heading engine

/// Mathematical constants
pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;

/// Normalize an angle in degrees into `[0, 360)`
///
/// # Example
/// ```
/// use compass_heading::normalize_degrees;
///
/// assert_eq!(normalize_degrees(-30.0), 330.0);
/// assert_eq!(normalize_degrees(370.0), 10.0);
/// assert_eq!(normalize_degrees(0.0), 0.0);
/// ```
pub fn normalize_degrees(degrees: f32) -> f32 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative remainders
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Signed rotation from `from` to `to` along the shorter arc, in degrees
///
/// Both inputs are expected in `[0, 360)`; the result lies in `[-180, 180]`.
///
/// # Example
/// ```
/// use compass_heading::shortest_delta;
///
/// assert_eq!(shortest_delta(350.0, 10.0), 20.0);
/// assert_eq!(shortest_delta(10.0, 350.0), -20.0);
/// ```
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    let mut to = to;
    if to - from > 180.0 {
        to -= 360.0;
    } else if to - from < -180.0 {
        to += 360.0;
    }
    to - from
}

/// Accelerate easing curve, `f(t) = t^(2 * factor)`
///
/// Starts slowly and speeds up; `factor = 1.0` is the plain parabola `t²`.
pub fn accelerate(input: f32, factor: f32) -> f32 {
    if factor == 1.0 {
        input * input
    } else {
        input.powf(2.0 * factor)
    }
}
