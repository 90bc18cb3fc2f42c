//! Error types for the compass heading engine
//!
//! None of these are fatal: the engine logs them and keeps the last good
//! value, and the session turns location failures into placeholder text.

use thiserror::Error;

use crate::types::SensorKind;

/// Orientation could not be derived from the current samples
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum OrientationError {
    /// Gravity vector too short to define "down" (device in free fall or zeroed)
    #[error("gravity vector too small (norm² = {norm_squared})")]
    FreeFall { norm_squared: f32 },
    /// Magnetic field parallel to gravity, or zero, so "east" is undefined
    #[error("magnetic field degenerate with respect to gravity (horizontal norm = {horizontal_norm})")]
    Degenerate { horizontal_norm: f32 },
}

/// A sensor subscription could not be made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    #[error("{0} is not available on this device")]
    Unavailable(SensorKind),
}

/// Location could not be obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("no location provider available")]
    NoProvider,
    #[error("location provider is out of service")]
    OutOfService,
}
