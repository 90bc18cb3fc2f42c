//! Heading engine: one tick of the compass pipeline
//!
//! Sensor callbacks write the latest samples into a [`SensorCell`]; every
//! tick the [`HeadingEngine`] checks calibration and recomputes the target
//! heading under the cell's lock, then advances the animated heading and
//! composes the direction label.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::animator::HeadingAnimator;
use crate::calibration::{CalibrationEvent, CalibrationMonitor};
use crate::direction::DirectionLabel;
use crate::orientation::target_heading;
use crate::types::{CalibrationMode, CompassSettings, SensorKind, SensorSample};

/// Latest sample of each sensor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    pub accelerometer: Option<SensorSample>,
    pub magnetometer: Option<SensorSample>,
}

/// Mutex-guarded latest samples, shared between sensor callbacks and the tick
///
/// Each sensor callback is the only writer of its own slot, unless the host
/// delivers both sensors together through [`SensorCell::record_pair`]. The
/// tick is the only reader. Reads that feed the target heading go through
/// [`SensorCell::with_latest`], which keeps the lock for the whole
/// recomputation.
#[derive(Debug, Default)]
pub struct SensorCell {
    latest: Mutex<SensorSnapshot>,
}

impl SensorCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the newest sample of `kind`
    pub fn record(&self, kind: SensorKind, sample: SensorSample) {
        let mut latest = self.latest.lock();
        match kind {
            SensorKind::Accelerometer => latest.accelerometer = Some(sample),
            SensorKind::Magnetometer => latest.magnetometer = Some(sample),
        }
    }

    /// Store a consistent accelerometer and magnetometer pair under one lock
    pub fn record_pair(&self, accelerometer: SensorSample, magnetometer: SensorSample) {
        let mut latest = self.latest.lock();
        latest.accelerometer = Some(accelerometer);
        latest.magnetometer = Some(magnetometer);
    }

    /// Copy of the current samples
    pub fn snapshot(&self) -> SensorSnapshot {
        *self.latest.lock()
    }

    /// Run `f` against the current samples while holding the lock
    pub fn with_latest<R>(&self, f: impl FnOnce(&SensorSnapshot) -> R) -> R {
        let latest = self.latest.lock();
        f(&latest)
    }

    /// Forget all samples
    pub fn clear(&self) {
        *self.latest.lock() = SensorSnapshot::default();
    }
}

/// Everything one tick produced for the view
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutput {
    /// Target heading after this tick's recomputation
    pub target_heading: f32,
    /// New dial heading, `None` when the dial already rests on the target
    pub heading: Option<f32>,
    /// Compass-rose label for the target heading
    pub direction: DirectionLabel,
    /// Calibration mode change, if one happened this tick
    pub calibration: Option<CalibrationEvent>,
}

/// Compass heading engine
///
/// Owns the calibration monitor and the heading animator; reads samples
/// from a shared [`SensorCell`].
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use nalgebra::Vector3;
/// use compass_heading::{HeadingEngine, SensorAccuracy, SensorCell, SensorKind, SensorSample};
///
/// let samples = Arc::new(SensorCell::new());
/// let mut engine = HeadingEngine::new(Arc::clone(&samples));
///
/// samples.record(SensorKind::Accelerometer, SensorSample::new(Vector3::new(0.0, 0.0, 10.0), SensorAccuracy::High));
/// samples.record(SensorKind::Magnetometer, SensorSample::new(Vector3::new(30.0, 0.0, 0.0), SensorAccuracy::High));
///
/// let output = engine.tick();
/// assert!((output.target_heading - 90.0).abs() < 1e-3);
/// assert!(output.heading.is_some());
/// ```
pub struct HeadingEngine {
    settings: CompassSettings,
    samples: Arc<SensorCell>,
    monitor: CalibrationMonitor,
    animator: HeadingAnimator,
    target_heading: f32,
}

impl HeadingEngine {
    /// Create an engine with default settings
    pub fn new(samples: Arc<SensorCell>) -> Self {
        Self::with_settings(samples, CompassSettings::default())
    }

    /// Create an engine with specified settings
    pub fn with_settings(samples: Arc<SensorCell>, settings: CompassSettings) -> Self {
        Self {
            settings,
            samples,
            monitor: CalibrationMonitor::new(&settings),
            animator: HeadingAnimator::new(&settings),
            target_heading: 0.0,
        }
    }

    /// Run one tick
    ///
    /// Calibration and target recomputation happen under the sample lock.
    /// A missing sensor or a degenerate sample pair keeps the previous
    /// target heading.
    pub fn tick(&mut self) -> TickOutput {
        let previous_target = self.target_heading;
        let monitor = &mut self.monitor;

        let (calibration, target) = self.samples.with_latest(|latest| {
            let calibration = latest
                .magnetometer
                .as_ref()
                .and_then(|magnetometer| monitor.update(magnetometer));

            let target = match (latest.accelerometer, latest.magnetometer) {
                (Some(accelerometer), Some(magnetometer)) => {
                    match target_heading(accelerometer.vector, magnetometer.vector) {
                        Ok(target) => target,
                        Err(error) => {
                            debug!(%error, "orientation not computable, keeping previous target");
                            previous_target
                        }
                    }
                }
                _ => previous_target,
            };

            (calibration, target)
        });

        self.target_heading = target;
        let heading = self.animator.tick(target);
        trace!(target_heading = target, current_heading = self.animator.current(), "tick");

        TickOutput {
            target_heading: target,
            heading,
            direction: DirectionLabel::from_target(target, self.settings.use_alternate_ordering),
            calibration,
        }
    }

    /// Most recent target heading in degrees
    pub fn target_heading(&self) -> f32 {
        self.target_heading
    }

    /// Animated dial heading in degrees
    pub fn current_heading(&self) -> f32 {
        self.animator.current()
    }

    pub fn calibration_mode(&self) -> CalibrationMode {
        self.monitor.mode()
    }

    pub fn samples(&self) -> &Arc<SensorCell> {
        &self.samples
    }

    /// Return to the freshly created state; the shared samples are kept
    pub fn reset(&mut self) {
        self.monitor.reset();
        self.animator.set_current(0.0);
        self.target_heading = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SensorAccuracy;
    use nalgebra::Vector3;

    fn sample(x: f32, y: f32, z: f32) -> SensorSample {
        SensorSample::new(Vector3::new(x, y, z), SensorAccuracy::High)
    }

    fn engine_with(accelerometer: Option<SensorSample>, magnetometer: Option<SensorSample>) -> HeadingEngine {
        let samples = Arc::new(SensorCell::new());
        if let Some(a) = accelerometer {
            samples.record(SensorKind::Accelerometer, a);
        }
        if let Some(m) = magnetometer {
            samples.record(SensorKind::Magnetometer, m);
        }
        HeadingEngine::new(samples)
    }

    #[test]
    fn test_cell_records_latest_sample() {
        let cell = SensorCell::new();
        assert_eq!(cell.snapshot(), SensorSnapshot::default());

        cell.record(SensorKind::Magnetometer, sample(1.0, 2.0, 3.0));
        cell.record(SensorKind::Magnetometer, sample(4.0, 5.0, 6.0));
        let snapshot = cell.snapshot();
        assert_eq!(snapshot.magnetometer, Some(sample(4.0, 5.0, 6.0)));
        assert_eq!(snapshot.accelerometer, None);

        cell.record_pair(sample(0.0, 0.0, 9.81), sample(0.0, 30.0, -20.0));
        let snapshot = cell.snapshot();
        assert_eq!(snapshot.accelerometer, Some(sample(0.0, 0.0, 9.81)));
        assert_eq!(snapshot.magnetometer, Some(sample(0.0, 30.0, -20.0)));

        cell.clear();
        assert_eq!(cell.snapshot(), SensorSnapshot::default());
    }

    #[test]
    fn test_no_samples_is_inert() {
        let mut engine = engine_with(None, None);
        for _ in 0..100 {
            let output = engine.tick();
            assert_eq!(output.target_heading, 0.0);
            assert_eq!(output.heading, None);
            assert_eq!(output.calibration, None);
        }
        assert_eq!(engine.calibration_mode(), CalibrationMode::Normal);
    }

    #[test]
    fn test_missing_accelerometer_keeps_target() {
        // An implausible field still drives calibration without an accelerometer
        let mut engine = engine_with(None, Some(sample(100.0, 0.0, 0.0)));
        let mut events = Vec::new();
        for _ in 0..50 {
            let output = engine.tick();
            assert_eq!(output.target_heading, 0.0);
            events.extend(output.calibration);
        }
        assert_eq!(events, vec![CalibrationEvent::CalibrationRequired]);
    }

    #[test]
    fn test_degenerate_samples_keep_previous_target() {
        let mut engine = engine_with(Some(sample(0.0, 0.0, 10.0)), Some(sample(30.0, 0.0, 0.0)));
        let first = engine.tick();
        assert!((first.target_heading - 90.0).abs() < 1e-3);

        // Field now parallel to gravity
        engine.samples().record(SensorKind::Magnetometer, sample(0.0, 0.0, 40.0));
        let second = engine.tick();
        assert_eq!(second.target_heading, first.target_heading);
    }

    #[test]
    fn test_tick_animates_toward_target() {
        let mut engine = engine_with(Some(sample(0.0, 0.0, 10.0)), Some(sample(30.0, 0.0, 0.0)));
        let output = engine.tick();

        let heading = output.heading.unwrap();
        assert!((heading - 0.16).abs() < 1e-4);
        assert_eq!(engine.current_heading(), heading);
        // Device faces west
        assert_eq!(output.direction.to_string(), "W 270°");
    }

    #[test]
    fn test_reset() {
        let mut engine = engine_with(Some(sample(0.0, 0.0, 10.0)), Some(sample(30.0, 0.0, 0.0)));
        for _ in 0..10 {
            engine.tick();
        }
        engine.reset();
        assert_eq!(engine.current_heading(), 0.0);
        assert_eq!(engine.target_heading(), 0.0);
        assert!(engine.samples().snapshot().magnetometer.is_some());
    }
}
