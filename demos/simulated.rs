//! Simulated compass screen
//!
//! Drives a compass session from a synthetic device that turns slowly
//! clockwise, passes a magnet for a couple of seconds and then settles.
//! The view prints dial redraws, labels and prompts to the console.
//!
//! Run with: `RUST_LOG=compass_heading=debug cargo run --example simulated`

use compass_heading::direction::DirectionLabel;
use compass_heading::location::{LocationEvent, LocationRequest, Position};
use compass_heading::platform::{
    CalibrationPrompt, HeadingRenderer, LocationCallback, LocationDisplay, LocationSource,
    SensorCallback, SensorSource,
};
use compass_heading::{
    CompassSession, CompassSettings, LocationError, SensorAccuracy, SensorError, SensorKind,
    SensorSample,
};
use nalgebra::Vector3;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

const SAMPLE_PERIOD: Duration = Duration::from_millis(20); // 50 Hz
const RUN_TIME: Duration = Duration::from_secs(12);

#[derive(Default)]
struct SimulatedSensors {
    callbacks: Arc<Mutex<Vec<(SensorKind, SensorCallback)>>>,
}

impl SensorSource for SimulatedSensors {
    fn subscribe(&mut self, kind: SensorKind, callback: SensorCallback) -> Result<(), SensorError> {
        self.callbacks.lock().push((kind, callback));
        Ok(())
    }

    fn unsubscribe(&mut self, kind: SensorKind) {
        self.callbacks.lock().retain(|(k, _)| *k != kind);
    }
}

struct SimulatedLocation {
    callback: Arc<Mutex<Option<LocationCallback>>>,
}

impl LocationSource for SimulatedLocation {
    fn last_known(&self) -> Result<Option<Position>, LocationError> {
        Ok(None)
    }

    fn subscribe(
        &mut self,
        _request: LocationRequest,
        callback: LocationCallback,
    ) -> Result<(), LocationError> {
        *self.callback.lock() = Some(callback);
        Ok(())
    }

    fn unsubscribe(&mut self) {
        *self.callback.lock() = None;
    }
}

#[derive(Default)]
struct ConsoleView {
    redraws: Mutex<u32>,
    label: Mutex<String>,
}

impl HeadingRenderer for ConsoleView {
    fn set_heading(&self, degrees: f32) {
        let mut redraws = self.redraws.lock();
        *redraws += 1;
        // Every 25th redraw is plenty for a terminal
        if *redraws % 25 == 0 {
            println!("dial {:7.2}°  {}", degrees, self.label.lock());
        }
    }

    fn set_direction(&self, label: &DirectionLabel) {
        *self.label.lock() = label.to_string();
    }
}

impl LocationDisplay for ConsoleView {
    fn set_location_text(&self, text: &str) {
        println!("location: {}", text);
    }
}

impl CalibrationPrompt for ConsoleView {
    fn show(&self) {
        println!(">>> Please calibrate the compass (move the device in a figure 8)");
    }

    fn dismiss(&self) {
        println!(">>> Calibration prompt dismissed");
    }
}

/// Device state at time `t`: (gravity, field, accuracy)
fn simulate(t: f32) -> (Vector3<f32>, Vector3<f32>, SensorAccuracy) {
    // 30°/s clockwise for 4 s, then hold at 120°
    let azimuth = (30.0 * t.min(4.0)).to_radians();
    let wobble = 0.08 * (t * 3.0).sin();

    let gravity = Vector3::new(wobble, 0.0, 9.81);
    let mut field = Vector3::new(-30.0 * azimuth.sin(), 30.0 * azimuth.cos(), -20.0);

    // Magnet nearby between 5 s and 7 s
    if (5.0..7.0).contains(&t) {
        field *= 2.5;
        return (gravity, field, SensorAccuracy::Low);
    }
    (gravity, field, SensorAccuracy::High)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("Simulated compass - turning to 120° with a magnet pass");

    let sensors = SimulatedSensors::default();
    let callbacks = Arc::clone(&sensors.callbacks);
    let location_callback = Arc::new(Mutex::new(None));
    let location = SimulatedLocation {
        callback: Arc::clone(&location_callback),
    };
    let view = Arc::new(ConsoleView::default());

    let mut session =
        CompassSession::start(sensors, location, Arc::clone(&view), CompassSettings::default());

    // Device feeding samples from its own task
    let feeder = tokio::spawn(async move {
        let mut interval = tokio::time::interval(SAMPLE_PERIOD);
        let mut t = 0.0f32;
        loop {
            interval.tick().await;
            let (gravity, field, accuracy) = simulate(t);

            let subscribers: Vec<(SensorKind, SensorCallback)> = callbacks.lock().clone();
            if subscribers.is_empty() && t > 0.0 {
                break;
            }
            for (kind, callback) in subscribers {
                let sample = match kind {
                    SensorKind::Accelerometer => SensorSample::new(gravity, SensorAccuracy::High),
                    SensorKind::Magnetometer => SensorSample::new(field, accuracy),
                };
                callback(sample);
            }
            t += SAMPLE_PERIOD.as_secs_f32();
        }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    let fix = location_callback.lock().clone();
    if let Some(callback) = fix {
        callback(LocationEvent::Moved(Position::new(47.6205, -122.3493)));
    }

    tokio::time::sleep(RUN_TIME).await;
    session.stop().await;
    feeder.await?;

    println!("Done after {} dial redraws", *view.redraws.lock());
    Ok(())
}
