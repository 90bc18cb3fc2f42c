//! Platform collaborators
//!
//! The engine never talks to hardware or widgets directly. A host wires in
//! a sensor source, a location source and a view implementing these traits;
//! tests and the demo use in-memory fakes.

use std::sync::Arc;

use crate::direction::DirectionLabel;
use crate::error::{LocationError, SensorError};
use crate::location::{LocationEvent, LocationRequest, Position};
use crate::types::{SensorKind, SensorSample};

/// Receives every sample of one sensor, possibly from a platform thread
pub type SensorCallback = Arc<dyn Fn(SensorSample) + Send + Sync>;

/// Receives location fixes and provider status changes
pub type LocationCallback = Arc<dyn Fn(LocationEvent) + Send + Sync>;

/// Delivers accelerometer and magnetometer samples at the platform's "game" rate
pub trait SensorSource: Send {
    /// Start delivering samples of `kind` to `callback`
    ///
    /// Returns [`SensorError::Unavailable`] when the device lacks the sensor.
    fn subscribe(&mut self, kind: SensorKind, callback: SensorCallback) -> Result<(), SensorError>;

    /// Stop delivering samples of `kind`; no-op when not subscribed
    fn unsubscribe(&mut self, kind: SensorKind);
}

/// Delivers position fixes
pub trait LocationSource: Send {
    /// Most recent fix the platform knows about, if any
    fn last_known(&self) -> Result<Option<Position>, LocationError>;

    /// Start delivering fixes and status changes to `callback`
    ///
    /// Status changes carry the result of [`LocationSource::last_known`] at
    /// the time of the change.
    fn subscribe(
        &mut self,
        request: LocationRequest,
        callback: LocationCallback,
    ) -> Result<(), LocationError>;

    /// Stop delivering updates; no-op when not subscribed
    fn unsubscribe(&mut self);
}

/// Draws the rotating dial
pub trait HeadingRenderer: Send + Sync {
    /// Redraw the dial rotated to `degrees`
    fn set_heading(&self, degrees: f32);

    /// Show the compass-rose label for the current target heading
    fn set_direction(&self, _label: &DirectionLabel) {}
}

/// Shows the latitude/longitude readout
pub trait LocationDisplay: Send + Sync {
    fn set_location_text(&self, text: &str);
}

/// Modal "please calibrate your compass" prompt
pub trait CalibrationPrompt: Send + Sync {
    fn show(&self);
    fn dismiss(&self);
}
