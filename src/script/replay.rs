//! Replaying a gesture script through the transform engine.

use super::{ControlStep, GestureScript, ImageSource, Step};
use crate::config::ViewerConfig;
use crate::constants::{MAX_SETTLE_FRAMES, REPLAY_FRAME_MS};
use crate::error::Result;
use lightbox_gesture::{Frame, ImageSize, TransformEngine, ViewerEvent, Viewport};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReplayRecord {
    /// What the renderer draws after `step`
    Frame { step: usize, frame: Frame },
    /// A notification raised while processing `step`
    Event { step: usize, event: ViewerEvent },
}

/// Run `script` and collect the frames and notifications it produces.
///
/// Image paths are resolved relative to `base_dir`. Every step records its
/// notifications followed by one frame; time steps record one frame per
/// simulated display refresh.
pub fn replay(
    script: &GestureScript,
    config: &ViewerConfig,
    base_dir: &Path,
) -> Result<Vec<ReplayRecord>> {
    let system_bar = script
        .viewport
        .system_bar
        .unwrap_or(config.system_bar_offset);
    let viewport =
        Viewport::new(script.viewport.width, script.viewport.height).with_system_bar(system_bar);

    let mut engine = TransformEngine::new(viewport, config.gesture);
    let image = resolve(script.image.as_ref(), base_dir)?;
    engine.show_image(image);
    engine.set_paging(script.paging);

    let mut records = Vec::new();
    let mut recorder = Recorder {
        records: &mut records,
        events: Vec::new(),
    };
    recorder.capture(&mut engine, 0);

    for (index, step) in script.steps.iter().enumerate() {
        let step_number = index + 1;
        match step {
            Step::Gesture(event) => {
                engine.handle(*event);
                recorder.capture(&mut engine, step_number);
            }
            Step::Control(ControlStep::Tick { ms }) => {
                let mut remaining = *ms;
                while remaining > 0 {
                    let frame_ms = remaining.min(REPLAY_FRAME_MS);
                    remaining -= frame_ms;
                    engine.tick(Duration::from_millis(frame_ms));
                    recorder.capture(&mut engine, step_number);
                }
            }
            Step::Control(ControlStep::Settle) => {
                let mut frames = 0;
                while engine.is_animating() && frames < MAX_SETTLE_FRAMES {
                    engine.tick(Duration::from_millis(REPLAY_FRAME_MS));
                    recorder.capture(&mut engine, step_number);
                    frames += 1;
                }
                if engine.is_animating() {
                    log::warn!(
                        "Step {}: animations still running after {} frames",
                        step_number,
                        frames
                    );
                }
            }
            Step::Control(ControlStep::Paging { enabled }) => {
                engine.set_paging(*enabled);
                recorder.capture(&mut engine, step_number);
            }
            Step::Control(ControlStep::ShowImage { image }) => {
                let image = resolve(image.as_ref(), base_dir)?;
                engine.show_image(image);
                recorder.capture(&mut engine, step_number);
            }
            Step::Control(ControlStep::ResolveImage { image }) => {
                let image = resolve(Some(image), base_dir)?;
                engine.set_image_size(image);
                recorder.capture(&mut engine, step_number);
            }
        }
    }

    log::debug!("Replay produced {} records", records.len());
    Ok(records)
}

fn resolve(source: Option<&ImageSource>, base_dir: &Path) -> Result<Option<ImageSize>> {
    source.map(|source| source.resolve(base_dir)).transpose()
}

struct Recorder<'a> {
    records: &'a mut Vec<ReplayRecord>,
    /// Scratch sink the engine dispatches into
    events: Vec<ViewerEvent>,
}

impl Recorder<'_> {
    fn capture(&mut self, engine: &mut TransformEngine, step: usize) {
        engine.dispatch(&mut self.events);
        self.records.extend(
            self.events
                .drain(..)
                .map(|event| ReplayRecord::Event { step, event }),
        );
        self.records.push(ReplayRecord::Frame {
            step,
            frame: engine.frame(),
        });
    }
}
