//! Consumer side of the bridge's event channel.

use std::thread::JoinHandle;

use crossbeam_channel::Receiver;
use orrery_catalog::FactSheet;
use orrery_controls::BridgeEvent;
use tracing::{debug, info};

/// Log every event until all bridge handles are dropped.
pub fn spawn_event_logger(events: Receiver<BridgeEvent>) -> std::io::Result<JoinHandle<usize>> {
    std::thread::Builder::new()
        .name("bridge-events".to_string())
        .spawn(move || drain(&events))
}

/// Returns the number of events seen.
fn drain(events: &Receiver<BridgeEvent>) -> usize {
    let mut seen = 0;
    for event in events.iter() {
        seen += 1;
        match event {
            BridgeEvent::CameraDistanceChanged(distance) => {
                debug!(distance, "camera distance changed");
            }
            BridgeEvent::BodyPicked(facts) => log_fact_sheet(&facts),
        }
    }
    seen
}

fn log_fact_sheet(facts: &FactSheet) {
    info!(
        body = %facts.name,
        diameter = %facts.diameter,
        distance = %facts.distance,
        temperature = %facts.temperature,
        day = %facts.day_length,
        year = %facts.year_length,
        moons = %facts.moons,
        composition = %facts.composition,
        atmosphere = %facts.atmosphere,
        "{}",
        facts.summary
    );
}
