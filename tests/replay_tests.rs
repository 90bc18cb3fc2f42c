use compass_heading::{
    CalibrationEvent, CalibrationMode, HeadingEngine, SensorAccuracy, SensorCell, SensorKind,
    SensorSample, shortest_delta,
};
use nalgebra::Vector3;
use serde::Deserialize;
use std::error::Error;
use std::sync::Arc;

/// One row per 20 ms tick: a level device turning from north to 60.4° east,
/// a stretch of strong magnetic interference, then a long hold
#[derive(Debug, Deserialize)]
struct ReplayRow {
    #[serde(rename = "Time (s)")]
    time: f32,
    #[serde(rename = "Accelerometer X (m/s^2)")]
    accel_x: f32,
    #[serde(rename = "Accelerometer Y (m/s^2)")]
    accel_y: f32,
    #[serde(rename = "Accelerometer Z (m/s^2)")]
    accel_z: f32,
    #[serde(rename = "Magnetometer X (uT)")]
    mag_x: f32,
    #[serde(rename = "Magnetometer Y (uT)")]
    mag_y: f32,
    #[serde(rename = "Magnetometer Z (uT)")]
    mag_z: f32,
    #[serde(rename = "Magnetometer Accuracy")]
    mag_accuracy: u8,
}

fn accuracy(level: u8) -> SensorAccuracy {
    match level {
        0 => SensorAccuracy::Unreliable,
        1 => SensorAccuracy::Low,
        2 => SensorAccuracy::Medium,
        _ => SensorAccuracy::High,
    }
}

fn load_rows() -> Result<Vec<ReplayRow>, Box<dyn Error>> {
    let mut reader = csv::Reader::from_path("testdata/compass_replay.csv")?;
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: ReplayRow = result?;
        rows.push(row);
    }
    Ok(rows)
}

#[test]
fn test_replay_recorded_session() -> Result<(), Box<dyn Error>> {
    let rows = load_rows()?;
    assert_eq!(rows.len(), 1080);

    let samples = Arc::new(SensorCell::new());
    let mut engine = HeadingEngine::new(Arc::clone(&samples));

    let mut events = Vec::new();
    let mut previous_heading = engine.current_heading();
    let mut previous_time = None;

    for (index, row) in rows.iter().enumerate() {
        if let Some(previous_time) = previous_time {
            assert!(row.time > previous_time, "rows out of order at {}", index);
        }
        previous_time = Some(row.time);

        samples.record(
            SensorKind::Accelerometer,
            SensorSample::new(
                Vector3::new(row.accel_x, row.accel_y, row.accel_z),
                SensorAccuracy::High,
            ),
        );
        samples.record(
            SensorKind::Magnetometer,
            SensorSample::new(
                Vector3::new(row.mag_x, row.mag_y, row.mag_z),
                accuracy(row.mag_accuracy),
            ),
        );

        let output = engine.tick();
        if let Some(event) = output.calibration {
            events.push((index, event));
        }

        let step = shortest_delta(previous_heading, engine.current_heading()).abs();
        assert!(step <= 1.0, "row {}: dial jumped {}°", index, step);
        previous_heading = engine.current_heading();
    }

    // 50 disturbed rows (300..) to raise the prompt, 50 clean rows (380..) to clear it
    assert_eq!(
        events,
        vec![
            (349, CalibrationEvent::CalibrationRequired),
            (429, CalibrationEvent::CalibrationRecovered),
        ]
    );
    assert_eq!(engine.calibration_mode(), CalibrationMode::Normal);

    // Device faces 60.4°, so the dial rests at 299.6°
    assert!((engine.target_heading() - 299.6).abs() < 0.01);
    assert!(shortest_delta(engine.current_heading(), engine.target_heading()).abs() < 0.01);

    let output = engine.tick();
    assert_eq!(output.heading, None);
    assert_eq!(output.direction.to_string(), "NE 60°");

    Ok(())
}

#[test]
fn test_replay_short_unreliable_burst_does_not_prompt() -> Result<(), Box<dyn Error>> {
    let rows = load_rows()?;
    let samples = Arc::new(SensorCell::new());
    let mut engine = HeadingEngine::new(Arc::clone(&samples));

    // The hold segment carries ten unreliable readings at rows 220..230
    for row in rows.iter().take(300) {
        samples.record(
            SensorKind::Accelerometer,
            SensorSample::new(
                Vector3::new(row.accel_x, row.accel_y, row.accel_z),
                SensorAccuracy::High,
            ),
        );
        samples.record(
            SensorKind::Magnetometer,
            SensorSample::new(
                Vector3::new(row.mag_x, row.mag_y, row.mag_z),
                accuracy(row.mag_accuracy),
            ),
        );
        assert_eq!(engine.tick().calibration, None);
    }

    assert!(rows[220..230].iter().all(|row| row.mag_accuracy == 0));
    assert_eq!(engine.calibration_mode(), CalibrationMode::Normal);
    Ok(())
}
