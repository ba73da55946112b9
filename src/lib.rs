//! SignPad — freehand signature capture for the asset-return intake form.
//!
//! The [`pad::SignaturePad`] owns a raster surface sized to its container,
//! turns pointer/touch input into round-capped strokes and hands each finished
//! signature to its owner as a PNG data URL. [`widget`] hosts it in egui,
//! [`replay`] and [`cli`] drive it headlessly.

#[macro_use]
pub mod logger;
#[macro_use]
pub mod i18n;

pub mod app;
pub mod capture;
pub mod cli;
pub mod input;
pub mod pad;
pub mod replay;
pub mod resize;
pub mod settings;
pub mod surface;
pub mod widget;

pub use input::{Gesture, InputEvent, PointerSource};
pub use pad::{SignaturePad, StrokeState};
pub use settings::{PadSettings, ResizePolicy};
pub use widget::SignaturePadWidget;
