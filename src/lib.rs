//! Compass Heading - the engine behind a phone compass screen
//!
//! Fuses the latest accelerometer and magnetometer samples into a target
//! heading, animates a dial toward it at a bounded, eased rate, watches the
//! magnetic field for interference and composes the compass-rose label and
//! the latitude/longitude readout shown next to the dial.
//!
//! # Features
//!
//! - Tilt-compensated heading from gravity and geomagnetic vectors
//! - Shortest-arc dial animation with per-tick rate limit and easing
//! - Debounced calibration prompt driven by magnetic field plausibility
//! - Direction labels with configurable north/south vs east/west ordering
//! - Degrees/minutes/seconds location readout
//! - Periodic tick task on tokio with clean cancellation
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use nalgebra::Vector3;
//! use compass_heading::{HeadingEngine, SensorAccuracy, SensorCell, SensorKind, SensorSample};
//!
//! let samples = Arc::new(SensorCell::new());
//! let mut engine = HeadingEngine::new(Arc::clone(&samples));
//!
//! // Level device, field pointing along the device x axis
//! let gravity = SensorSample::new(Vector3::new(0.0, 0.0, 9.81), SensorAccuracy::High);
//! let field = SensorSample::new(Vector3::new(30.0, 0.0, 0.0), SensorAccuracy::High);
//! samples.record(SensorKind::Accelerometer, gravity);
//! samples.record(SensorKind::Magnetometer, field);
//!
//! // Run ticks until the dial rests on the target
//! while engine.tick().heading.is_some() {}
//!
//! assert!((engine.current_heading() - 90.0).abs() < 0.01);
//! let label = engine.tick().direction;
//! assert_eq!(label.to_string(), "W 270°");
//! ```
//!
//! Hosts that want the ticking, subscriptions and view updates handled for
//! them use [`CompassSession`] together with the [`platform`] traits.

pub mod animator;
pub mod calibration;
pub mod direction;
pub mod engine;
pub mod error;
pub mod location;
mod math;
pub mod orientation;
pub mod platform;
pub mod session;
mod types;

// Re-export the commonly used types and functions
pub use calibration::{CalibrationEvent, CalibrationMonitor};
pub use direction::DirectionLabel;
pub use engine::{HeadingEngine, SensorCell, TickOutput};
pub use error::{LocationError, OrientationError, SensorError};
pub use math::{DEG_TO_RAD, RAD_TO_DEG, accelerate, normalize_degrees, shortest_delta};
pub use orientation::target_heading;
pub use session::CompassSession;
pub use types::*;
