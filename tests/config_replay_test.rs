//! Configuration files and recorded-session replay

mod test_helpers;

use posture_capture::{
    app::{ReplayApp, ReplaySession, ReplayStep},
    capture::StatusKind,
    config::{Config, EXAMPLE_CONFIG},
    Error,
};
use std::path::PathBuf;
use test_helpers::{front_pose_frame, side_pose_frame};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("posture-capture-{}-{name}", std::process::id()))
}

#[test]
fn test_config_file_round_trip() {
    let path = temp_path("config.yaml");
    let mut config = Config::default();
    config.capture.countdown_start = 3;
    config.feedback.cooldown_ms = 1500;
    config.to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.capture.countdown_start, 3);
    assert_eq!(loaded.feedback.cooldown_ms, 1500);
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_io_error() {
    let result = Config::from_file(temp_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_malformed_config_is_config_error() {
    let result = Config::from_yaml("capture: [1, 2");
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_values_rejected() {
    let mut config = Config::default();
    config.framing.box_margin = 0.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detection.min_confidence = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.side_reference.arms_overlap_max = -1.0;
    assert!(config.validate().is_err());
}

fn recorded_session() -> ReplaySession {
    let mut steps = Vec::new();
    let mut at_ms = 0;

    for (frame, start) in [(front_pose_frame(), 0), (side_pose_frame(), 9000)] {
        at_ms = at_ms.max(start);
        for _ in 0..10 {
            steps.push(ReplayStep::Frame {
                at_ms,
                frame: Some(frame.clone()),
            });
            at_ms += 33;
        }
        let locked = at_ms - 33;
        for i in 1..=5 {
            steps.push(ReplayStep::Tick { at_ms: locked + i * 1000 });
        }
        at_ms = locked + 7000;
        steps.push(ReplayStep::Tick { at_ms });
    }
    steps.push(ReplayStep::Frame { at_ms: at_ms + 100, frame: None });
    ReplaySession { steps }
}

#[test]
fn test_replay_captures_both_poses() {
    let app = ReplayApp::new(Config::default()).unwrap();
    let session = recorded_session();
    let summary = app.run(&session).unwrap();

    assert!(summary.both_captured());
    assert_eq!(summary.frames_processed, 21);
    assert_eq!(summary.frames_dropped, 0);
    assert_eq!(summary.ticks, 12);
    assert_eq!(summary.statuses.first(), Some(&StatusKind::CameraStarted));
    assert_eq!(summary.statuses.last(), Some(&StatusKind::BothPosesCaptured));

    let (front, side) = summary.captured.unwrap();
    assert!(matches!(session.steps[front], ReplayStep::Frame { .. }));
    assert!(matches!(session.steps[side], ReplayStep::Frame { .. }));
    assert!(front < side);
    assert!(summary.cues.iter().any(|c| c == "Perfect! Both poses captured!"));
    assert!(summary.to_string().contains("Both poses captured"));
}

#[test]
fn test_replay_file_round_trip() {
    let path = temp_path("session.yaml");
    let session = recorded_session();
    std::fs::write(&path, serde_yaml::to_string(&session).unwrap()).unwrap();

    let loaded = ReplaySession::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded.steps.len(), session.steps.len());
}

#[test]
fn test_replay_reset_abandons_capture() {
    let mut session = recorded_session();
    session.steps.truncate(15);
    let reset_at = session.steps.last().map_or(0, ReplayStep::at_ms);
    session.steps.push(ReplayStep::Reset { at_ms: reset_at });

    let summary = ReplayApp::new(Config::default()).unwrap().run(&session).unwrap();
    assert_eq!(summary.resets, 1);
    assert!(!summary.both_captured());
    assert!(!summary.statuses.contains(&StatusKind::FrontPoseCaptured));
}
