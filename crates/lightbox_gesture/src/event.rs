//! Gesture input and viewer notifications.

use crate::transform::Vector;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Normalized gesture events delivered by the host's gesture recognizer.
///
/// Positions are absolute viewport coordinates. Pinch scale and pan
/// translation are cumulative since the gesture became active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    /// Two fingers went down; `focal` is the midpoint between them
    PinchStart { focal: Vector },
    /// Pinch distance changed; `scale` is relative to the start of the pinch
    PinchChange { scale: f32 },
    PinchEnd,
    /// Averaged touch translation changed with `pointers` fingers down
    PanChange { translation: Vector, pointers: u32 },
    PanEnd,
    /// Single-finger vertical drag on an unzoomed image
    DismissChange { translation_y: f32 },
    DismissEnd { velocity_y: f32 },
    /// A completed tap; `count` is 2 for a double tap
    Tap { position: Vector, count: u32 },
}

/// Notifications raised by the viewer for its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ViewerEvent {
    /// The image became zoomed (`true`) or returned to rest (`false`)
    ZoomStateChanged(bool),
    /// A single tap completed (used to toggle surrounding chrome)
    Tap,
    /// A dismiss swipe passed its threshold; the host should close the viewer
    Dismiss,
}

/// Destination for viewer notifications.
///
/// Delivery is fire-and-forget: a sink that cannot deliver drops the event.
pub trait EventSink {
    fn emit(&mut self, event: ViewerEvent);
}

impl EventSink for Vec<ViewerEvent> {
    fn emit(&mut self, event: ViewerEvent) {
        self.push(event);
    }
}

/// Hands notifications to another thread (typically the UI thread).
impl EventSink for Sender<ViewerEvent> {
    fn emit(&mut self, event: ViewerEvent) {
        if self.send(event).is_err() {
            log::debug!("Dropping {:?}: receiver is gone", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_gesture_event_json_shape() {
        let json = r#"{ "type": "pan_change", "translation": { "x": 3.0, "y": -4.0 }, "pointers": 1 }"#;
        let event: GestureEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            GestureEvent::PanChange {
                translation: Vector::new(3.0, -4.0),
                pointers: 1
            }
        );

        let event: GestureEvent = serde_json::from_str(r#"{ "type": "pinch_end" }"#).unwrap();
        assert_eq!(event, GestureEvent::PinchEnd);
    }

    #[test]
    fn test_viewer_event_json_shape() {
        let json = serde_json::to_string(&ViewerEvent::ZoomStateChanged(true)).unwrap();
        assert_eq!(json, r#"{"type":"zoom_state_changed","value":true}"#);
        let json = serde_json::to_string(&ViewerEvent::Tap).unwrap();
        assert_eq!(json, r#"{"type":"tap"}"#);
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (mut tx, rx) = mpsc::channel::<ViewerEvent>();
        tx.emit(ViewerEvent::Tap);
        assert_eq!(rx.recv().unwrap(), ViewerEvent::Tap);
        drop(rx);
        tx.emit(ViewerEvent::Dismiss);
    }
}
