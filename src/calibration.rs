//! Magnetometer calibration monitoring for the compass heading engine

use tracing::{debug, info};

use crate::types::{CalibrationMode, CompassSettings, SensorSample};

/// Mode change produced by [`CalibrationMonitor::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationEvent {
    /// Field has been implausible for long enough; ask the user to calibrate
    CalibrationRequired,
    /// Field has been plausible again for long enough; dismiss the prompt
    CalibrationRecovered,
}

/// Calibration monitor
///
/// Watches the magnetometer field strength and accuracy on every tick and
/// switches between [`CalibrationMode::Normal`] and
/// [`CalibrationMode::Calibrating`] with a debounce on both edges, so a
/// handful of noisy samples never flaps the calibration prompt.
///
/// Only one streak counter is ever non-zero: the monitor counts implausible
/// samples while in normal mode and plausible samples while calibrating.
#[derive(Debug, Clone, Copy)]
pub struct CalibrationMonitor {
    /// Current mode
    mode: CalibrationMode,
    /// Consecutive plausible samples seen while calibrating
    accurate_streak: u32,
    /// Consecutive implausible samples seen in normal mode
    inaccurate_streak: u32,
    /// Plausible field norm window
    min_field_strength: f32,
    max_field_strength: f32,
    /// Debounce lengths
    accurate_threshold: u32,
    inaccurate_threshold: u32,
}

impl CalibrationMonitor {
    /// Create a monitor in normal mode
    ///
    /// # Example
    /// ```
    /// use compass_heading::{CalibrationMode, CompassSettings};
    /// use compass_heading::calibration::CalibrationMonitor;
    ///
    /// let monitor = CalibrationMonitor::new(&CompassSettings::default());
    /// assert_eq!(monitor.mode(), CalibrationMode::Normal);
    /// ```
    pub fn new(settings: &CompassSettings) -> Self {
        Self {
            mode: CalibrationMode::Normal,
            accurate_streak: 0,
            inaccurate_streak: 0,
            min_field_strength: settings.min_field_strength,
            max_field_strength: settings.max_field_strength,
            accurate_threshold: settings.accurate_threshold,
            inaccurate_threshold: settings.inaccurate_threshold,
        }
    }

    /// Whether a magnetometer sample looks like the undisturbed geomagnetic field
    ///
    /// The norm must lie inside the configured window (inclusive) and the
    /// sample must not be flagged unreliable.
    pub fn is_plausible(&self, magnetometer: &SensorSample) -> bool {
        let strength = magnetometer.norm();
        magnetometer.accuracy.is_reliable()
            && strength >= self.min_field_strength
            && strength <= self.max_field_strength
    }

    /// Feed the latest magnetometer sample
    ///
    /// Returns the mode change, if this sample completed a debounce streak.
    ///
    /// # Example
    /// ```
    /// use nalgebra::Vector3;
    /// use compass_heading::{CompassSettings, SensorAccuracy, SensorSample};
    /// use compass_heading::calibration::{CalibrationEvent, CalibrationMonitor};
    ///
    /// let mut monitor = CalibrationMonitor::new(&CompassSettings::default());
    /// let disturbed = SensorSample::new(Vector3::new(120.0, 0.0, 0.0), SensorAccuracy::High);
    ///
    /// let events: Vec<_> = (0..50).filter_map(|_| monitor.update(&disturbed)).collect();
    /// assert_eq!(events, vec![CalibrationEvent::CalibrationRequired]);
    /// ```
    pub fn update(&mut self, magnetometer: &SensorSample) -> Option<CalibrationEvent> {
        let plausible = self.is_plausible(magnetometer);
        debug!(field_strength = magnetometer.norm(), plausible, mode = ?self.mode, "magnetometer sample");

        match self.mode {
            CalibrationMode::Normal => {
                if plausible {
                    self.inaccurate_streak = 0;
                } else {
                    self.inaccurate_streak += 1;
                }
                debug!(inaccurate_streak = self.inaccurate_streak);

                if self.inaccurate_streak >= self.inaccurate_threshold {
                    self.switch_mode(CalibrationMode::Calibrating);
                    return Some(CalibrationEvent::CalibrationRequired);
                }
            }
            CalibrationMode::Calibrating => {
                if plausible {
                    self.accurate_streak += 1;
                } else {
                    self.accurate_streak = 0;
                }
                debug!(accurate_streak = self.accurate_streak);

                if self.accurate_streak >= self.accurate_threshold {
                    self.switch_mode(CalibrationMode::Normal);
                    return Some(CalibrationEvent::CalibrationRecovered);
                }
            }
        }

        None
    }

    /// Reset to normal mode with both streaks cleared
    pub fn reset(&mut self) {
        self.mode = CalibrationMode::Normal;
        self.accurate_streak = 0;
        self.inaccurate_streak = 0;
    }

    /// Current mode
    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    /// Consecutive plausible samples counted while calibrating
    pub fn accurate_streak(&self) -> u32 {
        self.accurate_streak
    }

    /// Consecutive implausible samples counted in normal mode
    pub fn inaccurate_streak(&self) -> u32 {
        self.inaccurate_streak
    }

    fn switch_mode(&mut self, mode: CalibrationMode) {
        info!(from = ?self.mode, to = ?mode, "calibration mode changed");
        self.mode = mode;
        self.accurate_streak = 0;
        self.inaccurate_streak = 0;
    }
}

impl Default for CalibrationMonitor {
    fn default() -> Self {
        Self::new(&CompassSettings::default())
    }
}
