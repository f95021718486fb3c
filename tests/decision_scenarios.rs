//! End-to-end scenarios: NMEA sentences in, render commands out

use speed_limit_display::{
    decision::{NO_LIMIT_FOUND, WAITING_FOR_GPS},
    toggle::ToggleState,
    DecisionLoop, FixTracker, GeoCoordinate, RenderCommand, SpeedZone, UnitMode, ZoneIndex,
};

const AT_40N_75W: &str = "$GPGGA,123519,4000.000,N,07500.000,W,1,08,0.9,545.4,M,46.9,M,,*47";
const VOID_RMC: &str = "$GPRMC,123520,V,4000.000,N,07500.000,W,022.4,084.4,230394,003.1,W*6A";

fn single_zone() -> ZoneIndex {
    ZoneIndex::new(vec![SpeedZone {
        center: GeoCoordinate::new(40.0005, -75.0).unwrap(),
        speed_limit_mph: 55,
    }])
}

#[test]
fn test_limit_shown_in_mph() {
    let mut tracker = FixTracker::new();
    tracker.update_from_sentence(AT_40N_75W);

    let mut decision = DecisionLoop::default();
    let command = decision.step(&ToggleState::new(), &tracker, &single_zone());

    assert_eq!(
        command,
        RenderCommand::ShowSpeedLimit {
            value: 55,
            unit: UnitMode::Mph
        }
    );
}

#[test]
fn test_limit_shown_in_kph() {
    let mut tracker = FixTracker::new();
    tracker.update_from_sentence(AT_40N_75W);

    let mut decision = DecisionLoop::new(UnitMode::Kph, 150.0);
    let command = decision.step(&ToggleState::new(), &tracker, &single_zone());

    assert_eq!(
        command,
        RenderCommand::ShowSpeedLimit {
            value: 89,
            unit: UnitMode::Kph
        }
    );
}

#[test]
fn test_no_fix_waits_regardless_of_zones() {
    let tracker = FixTracker::new();
    let mut decision = DecisionLoop::default();

    for zones in [ZoneIndex::default(), single_zone()] {
        let command = decision.step(&ToggleState::new(), &tracker, &zones);
        assert_eq!(command, RenderCommand::message(WAITING_FOR_GPS));
    }
}

#[test]
fn test_lost_fix_returns_to_waiting() {
    let mut tracker = FixTracker::new();
    let mut decision = DecisionLoop::default();
    let toggle = ToggleState::new();
    let zones = single_zone();

    tracker.update_from_sentence(AT_40N_75W);
    assert!(matches!(
        decision.step(&toggle, &tracker, &zones),
        RenderCommand::ShowSpeedLimit { .. }
    ));

    tracker.update_from_sentence(VOID_RMC);
    assert_eq!(
        decision.step(&toggle, &tracker, &zones),
        RenderCommand::message(WAITING_FOR_GPS)
    );
}

#[test]
fn test_smaller_radius_finds_nothing() {
    let mut tracker = FixTracker::new();
    tracker.update_from_sentence(AT_40N_75W);

    let mut decision = DecisionLoop::new(UnitMode::Mph, 50.0);
    let command = decision.step(&ToggleState::new(), &tracker, &single_zone());

    assert_eq!(command, RenderCommand::message(NO_LIMIT_FOUND));
}

#[test]
fn test_touch_toggles_between_cycles() {
    let mut tracker = FixTracker::new();
    tracker.update_from_sentence(AT_40N_75W);

    let mut decision = DecisionLoop::default();
    let toggle = ToggleState::new();
    let zones = single_zone();

    toggle.request_toggle();
    assert_eq!(
        decision.step(&toggle, &tracker, &zones),
        RenderCommand::ShowSpeedLimit {
            value: 89,
            unit: UnitMode::Kph
        }
    );

    toggle.request_toggle();
    assert_eq!(
        decision.step(&toggle, &tracker, &zones),
        RenderCommand::ShowSpeedLimit {
            value: 55,
            unit: UnitMode::Mph
        }
    );
    assert_eq!(decision.unit(), UnitMode::Mph);
}

#[tokio::test]
async fn test_demo_drive_replay() {
    use speed_limit_display::monitor::ingest_lines;
    use std::{
        path::Path,
        sync::{atomic::AtomicBool, Arc, RwLock},
        time::Duration,
    };

    let demos = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos");
    let zones = ZoneIndex::load(&demos.join("speed_limits.json")).unwrap();
    assert_eq!(zones.len(), 2);

    let file = tokio::fs::File::open(demos.join("drive.nmea")).await.unwrap();
    let tracker = Arc::new(RwLock::new(FixTracker::new()));
    let lines = ingest_lines(
        tokio::io::BufReader::new(file),
        Arc::clone(&tracker),
        Arc::new(AtomicBool::new(true)),
        Duration::from_millis(100),
        None,
    )
    .await;
    assert_eq!(lines, 7);

    // The capture ends on a void RMC sentence
    let mut decision = DecisionLoop::default();
    let command = decision.step(&ToggleState::new(), &tracker.read().unwrap(), &zones);
    assert_eq!(command, RenderCommand::message(WAITING_FOR_GPS));
}
