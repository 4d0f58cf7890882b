use crate::config::ViewerConfig;
use crate::script::{GestureScript, ReplayRecord, replay};
use lightbox_gesture::{Frame, ViewerEvent};
use std::path::Path;

fn run(json: &str) -> Vec<ReplayRecord> {
    let script = GestureScript::from_json(json).unwrap();
    replay(&script, &ViewerConfig::default(), Path::new(".")).unwrap()
}

fn events(records: &[ReplayRecord]) -> Vec<ViewerEvent> {
    records
        .iter()
        .filter_map(|record| match record {
            ReplayRecord::Event { event, .. } => Some(*event),
            ReplayRecord::Frame { .. } => None,
        })
        .collect()
}

fn last_frame(records: &[ReplayRecord]) -> Frame {
    records
        .iter()
        .rev()
        .find_map(|record| match record {
            ReplayRecord::Frame { frame, .. } => Some(*frame),
            ReplayRecord::Event { .. } => None,
        })
        .unwrap()
}

#[test]
fn test_initial_frame_is_identity() {
    let records = run(r#"{ "viewport": { "width": 1000, "height": 1000 }, "steps": [] }"#);
    assert_eq!(
        records,
        vec![ReplayRecord::Frame {
            step: 0,
            frame: Frame {
                translate_x: 0.0,
                translate_y: 0.0,
                scale: 1.0,
                opacity: 1.0,
            },
        }]
    );
}

#[test]
fn test_double_tap_then_settle() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "image": { "width": 4000, "height": 2000 },
        "steps": [
            { "type": "tap", "position": { "x": 500, "y": 500 }, "count": 2 },
            { "type": "settle" }
        ]
    }"#);

    let frame = last_frame(&records);
    assert_eq!((frame.translate_x, frame.translate_y, frame.scale), (0.0, 0.0, 2.0));
    assert_eq!(events(&records), vec![ViewerEvent::ZoomStateChanged(true)]);

    // The settle step produced intermediate frames.
    let settle_frames = records
        .iter()
        .filter(|record| matches!(record, ReplayRecord::Frame { step: 2, .. }))
        .count();
    assert!(settle_frames > 1);
}

#[test]
fn test_tick_splits_into_frames() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "steps": [ { "type": "tick", "ms": 40 } ]
    }"#);
    // Initial frame plus 16 + 16 + 8 ms.
    assert_eq!(records.len(), 4);
}

#[test]
fn test_gestures_wait_for_image_metadata() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "steps": [
            { "type": "pinch_start", "focal": { "x": 500, "y": 500 } },
            { "type": "pinch_change", "scale": 3 },
            { "type": "pinch_end" },
            { "type": "resolve_image", "image": { "width": 4000, "height": 2000 } },
            { "type": "pinch_start", "focal": { "x": 500, "y": 500 } },
            { "type": "pinch_change", "scale": 3 },
            { "type": "pinch_end" }
        ]
    }"#);

    let scale_after_first_pinch = records
        .iter()
        .find_map(|record| match record {
            ReplayRecord::Frame { step: 3, frame } => Some(frame.scale),
            _ => None,
        })
        .unwrap();
    assert_eq!(scale_after_first_pinch, 1.0);
    assert_eq!(last_frame(&records).scale, 3.0);
}

#[test]
fn test_single_tap_and_dismiss_events() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "image": { "width": 1000, "height": 1000 },
        "steps": [
            { "type": "tap", "position": { "x": 10, "y": 10 }, "count": 1 },
            { "type": "dismiss_change", "translation_y": 320 },
            { "type": "dismiss_end", "velocity_y": 0 }
        ]
    }"#);
    assert_eq!(
        events(&records),
        vec![ViewerEvent::Tap, ViewerEvent::Dismiss]
    );
    assert!(records.contains(&ReplayRecord::Event {
        step: 1,
        event: ViewerEvent::Tap
    }));
}

#[test]
fn test_paging_script_ignores_taps() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "paging": true,
        "steps": [
            { "type": "tap", "position": { "x": 10, "y": 10 }, "count": 1 },
            { "type": "paging", "enabled": false },
            { "type": "tap", "position": { "x": 10, "y": 10 }, "count": 1 }
        ]
    }"#);
    assert_eq!(
        records
            .iter()
            .filter(|record| matches!(record, ReplayRecord::Event { .. }))
            .collect::<Vec<_>>(),
        vec![&ReplayRecord::Event {
            step: 3,
            event: ViewerEvent::Tap
        }]
    );
}

#[test]
fn test_show_image_resets_zoom() {
    let records = run(r#"{
        "viewport": { "width": 1000, "height": 1000 },
        "image": { "width": 4000, "height": 2000 },
        "steps": [
            { "type": "pinch_start", "focal": { "x": 500, "y": 500 } },
            { "type": "pinch_change", "scale": 2 },
            { "type": "pinch_end" },
            { "type": "show_image", "image": { "width": 800, "height": 600 } }
        ]
    }"#);
    assert_eq!(last_frame(&records).scale, 1.0);
    assert_eq!(
        events(&records),
        vec![
            ViewerEvent::ZoomStateChanged(true),
            ViewerEvent::ZoomStateChanged(false)
        ]
    );
}

#[test]
fn test_record_json_shape() {
    let record = ReplayRecord::Event {
        step: 4,
        event: ViewerEvent::Dismiss,
    };
    let json = serde_json::to_string(&record).unwrap();
    assert_eq!(json, r#"{"kind":"event","step":4,"event":{"type":"dismiss"}}"#);
}
