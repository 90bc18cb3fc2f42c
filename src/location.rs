//! Latitude/longitude readout

use core::time::Duration;

use crate::error::LocationError;
use crate::types::CompassSettings;

/// Shown until the first fix arrives
pub const GETTING_LOCATION: &str = "Getting location...";

/// Shown when no provider exists or the provider is out of service
pub const CANNOT_GET_LOCATION: &str = "Cannot get location";

/// Separator between the latitude and longitude parts
const PART_SEPARATOR: &str = "    ";

/// Geographic position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Provider status as reported by the location source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationStatus {
    Available,
    TemporarilyUnavailable,
    OutOfService,
}

/// Update delivered by a location subscription
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationEvent {
    /// A new fix
    Moved(Position),
    /// The provider changed status
    ///
    /// Carries the provider's last known fix as of the change, `None` if it
    /// has none.
    StatusChanged {
        status: LocationStatus,
        last_known: Option<Position>,
    },
}

/// Update cadence requested from the location source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationRequest {
    pub min_interval: Duration,
    pub min_distance_m: f32,
}

impl LocationRequest {
    pub fn from_settings(settings: &CompassSettings) -> Self {
        Self {
            min_interval: settings.location_min_interval,
            min_distance_m: settings.location_min_distance_m,
        }
    }
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self::from_settings(&CompassSettings::default())
    }
}

/// Format an unsigned angle as `{deg}°{min}'{sec}"`, truncating each part
///
/// # Example
/// ```
/// use compass_heading::location::format_dms;
///
/// assert_eq!(format_dms(12.5), "12°30'0\"");
/// ```
pub fn format_dms(value: f64) -> String {
    let degrees = value.trunc();
    let total_seconds = ((value - degrees) * 3600.0) as u32;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}°{}'{}\"", degrees as u32, minutes, seconds)
}

/// Text for the location readout
///
/// Latitude first, then longitude, each prefixed by its hemisphere. Zero
/// latitude counts as north, zero longitude as east.
///
/// # Example
/// ```
/// use compass_heading::location::{GETTING_LOCATION, Position, format_position};
///
/// assert_eq!(format_position(None), GETTING_LOCATION);
/// assert_eq!(
///     format_position(Some(&Position::new(-33.5, 151.25))),
///     "South 33°30'0\"    East 151°15'0\""
/// );
/// ```
pub fn format_position(position: Option<&Position>) -> String {
    let Some(position) = position else {
        return GETTING_LOCATION.to_string();
    };

    let latitude = if position.latitude >= 0.0 {
        format!("North {}", format_dms(position.latitude))
    } else {
        format!("South {}", format_dms(-position.latitude))
    };
    let longitude = if position.longitude >= 0.0 {
        format!("East {}", format_dms(position.longitude))
    } else {
        format!("West {}", format_dms(-position.longitude))
    };

    format!("{latitude}{PART_SEPARATOR}{longitude}")
}

/// Text shown for a location failure
pub fn failure_text(error: &LocationError) -> &'static str {
    match error {
        LocationError::NoProvider | LocationError::OutOfService => CANNOT_GET_LOCATION,
    }
}

/// Turns location events into readout text
///
/// A provider coming back into service shows its own last known fix again
/// without waiting for the next update.
#[derive(Debug, Clone, Default)]
pub struct LocationTracker {
    last_known: Option<Position>,
}

impl LocationTracker {
    pub fn new(last_known: Option<Position>) -> Self {
        Self { last_known }
    }

    pub fn last_known(&self) -> Option<Position> {
        self.last_known
    }

    /// Readout text for the current state
    pub fn text(&self) -> String {
        format_position(self.last_known.as_ref())
    }

    /// Apply an event and return the text to display
    pub fn handle(&mut self, event: LocationEvent) -> String {
        match event {
            LocationEvent::Moved(position) => {
                self.last_known = Some(position);
                self.text()
            }
            LocationEvent::StatusChanged {
                status: LocationStatus::OutOfService,
                ..
            } => failure_text(&LocationError::OutOfService).to_string(),
            LocationEvent::StatusChanged { last_known, .. } => {
                self.last_known = last_known;
                self.text()
            }
        }
    }
}
