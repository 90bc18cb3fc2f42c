//! Compass session lifecycle
//!
//! A [`CompassSession`] is the foreground lifetime of a compass screen: it
//! subscribes to the sensors and the location source, runs the heading
//! engine on a periodic tokio task and pushes every tick's output to the
//! view. Stopping (or dropping) the session tears all of it down.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::calibration::CalibrationEvent;
use crate::engine::{HeadingEngine, SensorCell, TickOutput};
use crate::location::{LocationEvent, LocationRequest, LocationTracker, failure_text};
use crate::platform::{
    CalibrationPrompt, HeadingRenderer, LocationCallback, LocationDisplay, LocationSource,
    SensorCallback, SensorSource,
};
use crate::types::{CompassSettings, SensorKind, SensorSample};

/// A running compass screen
///
/// # Example
/// ```no_run
/// # use std::sync::Arc;
/// # use compass_heading::{CompassSession, CompassSettings};
/// # use compass_heading::platform::*;
/// # async fn run<S: SensorSource, L: LocationSource, V>(sensors: S, location: L, view: Arc<V>)
/// # where V: HeadingRenderer + LocationDisplay + CalibrationPrompt + 'static {
/// let mut session = CompassSession::start(sensors, location, view, CompassSettings::default());
/// // ... screen visible ...
/// session.stop().await;
/// # }
/// ```
pub struct CompassSession<S: SensorSource, L: LocationSource> {
    sensors: S,
    location: L,
    samples: Arc<SensorCell>,
    subscribed: Vec<SensorKind>,
    location_subscribed: bool,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<S: SensorSource, L: LocationSource> CompassSession<S, L> {
    /// Subscribe to all sources and start ticking
    ///
    /// A missing sensor is logged and skipped; the compass keeps running
    /// with whatever samples it gets. Location failures are shown in the
    /// location readout.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn start<V>(sensors: S, location: L, view: Arc<V>, settings: CompassSettings) -> Self
    where
        V: HeadingRenderer + LocationDisplay + CalibrationPrompt + 'static,
    {
        let samples = Arc::new(SensorCell::new());
        let mut session = Self {
            sensors,
            location,
            samples: Arc::clone(&samples),
            subscribed: Vec::with_capacity(2),
            location_subscribed: false,
            shutdown: None,
            task: None,
        };

        session.subscribe_sensors();
        session.subscribe_location(&view, &settings);

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let engine = HeadingEngine::with_settings(samples, settings);
        session.task = Some(tokio::spawn(run_ticks(
            engine,
            view,
            settings.tick_period,
            shutdown_rx,
        )));
        session.shutdown = Some(shutdown_tx);

        info!(
            tick_period_ms = settings.tick_period.as_millis() as u64,
            sensors = session.subscribed.len(),
            location = session.location_subscribed,
            "compass session started"
        );
        session
    }

    fn subscribe_sensors(&mut self) {
        for kind in [SensorKind::Accelerometer, SensorKind::Magnetometer] {
            let samples = Arc::clone(&self.samples);
            let callback: SensorCallback = Arc::new(move |sample: SensorSample| samples.record(kind, sample));

            match self.sensors.subscribe(kind, callback) {
                Ok(()) => self.subscribed.push(kind),
                Err(error) => warn!(%error, "sensor skipped"),
            }
        }
    }

    fn subscribe_location<V>(&mut self, view: &Arc<V>, settings: &CompassSettings)
    where
        V: LocationDisplay + 'static,
    {
        let last_known = match self.location.last_known() {
            Ok(last_known) => last_known,
            Err(error) => {
                warn!(%error, "location unavailable");
                view.set_location_text(failure_text(&error));
                return;
            }
        };

        let tracker = LocationTracker::new(last_known);
        let text = tracker.text();
        view.set_location_text(&text);
        let tracker = Arc::new(Mutex::new(tracker));

        let display = Arc::clone(view);
        let callback: LocationCallback = Arc::new(move |event: LocationEvent| {
            let text = tracker.lock().handle(event);
            display.set_location_text(&text);
        });

        match self
            .location
            .subscribe(LocationRequest::from_settings(settings), callback)
        {
            Ok(()) => self.location_subscribed = true,
            Err(error) => {
                warn!(%error, "location updates unavailable");
                view.set_location_text(failure_text(&error));
            }
        }
    }

    /// Whether the tick task is still scheduled
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Unsubscribe from all sources and stop ticking
    ///
    /// Waits for an in-flight tick to finish. Calling `stop` again is a no-op.
    pub async fn stop(&mut self) {
        self.release_sources();

        if let Some(shutdown) = self.shutdown.take() {
            // Receiver is gone only if the task already ended
            let _ = shutdown.send(());
        }

        if let Some(task) = self.task.take() {
            if let Err(error) = task.await {
                warn!(%error, "compass tick task failed");
            }
            info!("compass session stopped");
        }
    }

    fn release_sources(&mut self) {
        for kind in self.subscribed.drain(..) {
            self.sensors.unsubscribe(kind);
        }
        if self.location_subscribed {
            self.location.unsubscribe();
            self.location_subscribed = false;
        }
    }
}

impl<S: SensorSource, L: LocationSource> Drop for CompassSession<S, L> {
    fn drop(&mut self) {
        self.release_sources();
        self.shutdown = None;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run_ticks<V>(
    mut engine: HeadingEngine,
    view: Arc<V>,
    period: Duration,
    mut shutdown: oneshot::Receiver<()>,
) where
    V: HeadingRenderer + CalibrationPrompt + ?Sized,
{
    debug!("compass tick started");

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(period) => {}
        }

        let output = engine.tick();
        present(view.as_ref(), &output);
    }

    debug!(
        target_heading = engine.target_heading(),
        current_heading = engine.current_heading(),
        "compass tick stopped"
    );
}

/// Push one tick's output to the view
fn present<V>(view: &V, output: &TickOutput)
where
    V: HeadingRenderer + CalibrationPrompt + ?Sized,
{
    match output.calibration {
        Some(CalibrationEvent::CalibrationRequired) => view.show(),
        Some(CalibrationEvent::CalibrationRecovered) => view.dismiss(),
        None => {}
    }

    if let Some(heading) = output.heading {
        view.set_heading(heading);
    }
    view.set_direction(&output.direction);
}
