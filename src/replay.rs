//! Headless replay of recorded input through a [`SignaturePad`].
//!
//! Script format (JSON):
//!
//! ```json
//! { "width": 320, "bounds": [10, 20],
//!   "events": [ {"type": "pointer_down", "x": 15, "y": 25},
//!               {"type": "pointer_move", "x": 60, "y": 70},
//!               {"type": "pointer_up"} ] }
//! ```
//!
//! Coordinates are global; `bounds` is the surface's top-left corner.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{Pos2, Rect, vec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::input::InputEvent;
use crate::pad::SignaturePad;
use crate::settings::PadSettings;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplayScript {
    pub width: u32,
    #[serde(default)]
    pub bounds: [f32; 2],
    pub events: Vec<ScriptEvent>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    TouchStart { touches: Vec<[f32; 2]> },
    TouchMove { touches: Vec<[f32; 2]> },
    TouchEnd,
    Clear,
    Resize { width: u32 },
}

impl ScriptEvent {
    fn to_input(&self) -> Option<InputEvent> {
        Some(match self {
            ScriptEvent::PointerDown { x, y } => InputEvent::PointerDown { pos: Pos2::new(*x, *y) },
            ScriptEvent::PointerMove { x, y } => InputEvent::PointerMove { pos: Pos2::new(*x, *y) },
            ScriptEvent::PointerUp => InputEvent::PointerUp,
            ScriptEvent::PointerLeave => InputEvent::PointerLeave,
            ScriptEvent::TouchStart { touches } => InputEvent::TouchStart { touches: points(touches) },
            ScriptEvent::TouchMove { touches } => InputEvent::TouchMove { touches: points(touches) },
            ScriptEvent::TouchEnd => InputEvent::TouchEnd,
            ScriptEvent::Clear | ScriptEvent::Resize { .. } => return None,
        })
    }
}

fn points(touches: &[[f32; 2]]) -> Vec<Pos2> {
    touches.iter().map(|[x, y]| Pos2::new(*x, *y)).collect()
}

/// Result of running a script to completion.
pub struct ReplayOutcome {
    /// Every value the capture callback received, in order.
    pub emissions: Vec<Option<String>>,
    /// The surface as it stands after the last event (`None` when degraded).
    pub final_image: Option<RgbaImage>,
    pub has_content: bool,
}

impl ReplayOutcome {
    /// The capture the owning form would hold after the script.
    pub fn capture(&self) -> Option<&str> {
        self.emissions.last().and_then(|v| v.as_deref())
    }
}

pub fn parse_script(source: &str) -> Result<ReplayScript, String> {
    serde_json::from_str(source).map_err(|e| format!("invalid replay script: {}", e))
}

pub fn replay(script: &ReplayScript, settings: &PadSettings) -> ReplayOutcome {
    let emissions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&emissions);
    let mut pad = SignaturePad::new(settings.clone(), move |v| sink.borrow_mut().push(v));
    pad.resize(script.width);

    let mut width = script.width;
    for event in &script.events {
        match event {
            ScriptEvent::Clear => pad.clear(),
            ScriptEvent::Resize { width: w } => {
                width = *w;
                pad.resize(width);
            }
            other => {
                if let Some(input) = other.to_input() {
                    let bounds = Rect::from_min_size(
                        Pos2::new(script.bounds[0], script.bounds[1]),
                        vec2(width as f32, pad.height() as f32),
                    );
                    pad.handle(&input, bounds);
                }
            }
        }
    }

    let final_image = pad.surface().map(|s| s.image().clone());
    let has_content = pad.has_content();
    drop(pad);
    let emissions = emissions.take();
    ReplayOutcome {
        emissions,
        final_image,
        has_content,
    }
}
