// ============================================================================
// SIGNATURE PAD — stroke state machine over a single raster surface
// ============================================================================
//
// begin:  Idle -> Drawing       (pointer down / touch start)
// extend: Drawing -> Drawing    (pointer move / touch move, ignored when Idle)
// end:    Drawing -> Idle       (pointer up / pointer leave / touch end)
//
// Every finished stroke emits the whole surface as a PNG data URL through the
// capture callback; clear emits `None`.

use egui::{Pos2, Rect};

use crate::capture;
use crate::input::{Gesture, InputEvent, PointerSource, resolve_local};
use crate::resize::{ResizeHub, Subscription};
use crate::settings::{PadSettings, ResizePolicy};
use crate::surface::Surface;

/// Receives `Some(data_url)` after each stroke and `None` on clear.
pub type CaptureCallback = Box<dyn FnMut(Option<String>)>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeState {
    Idle,
    /// `last` is the end of the most recently drawn segment.
    Drawing { last: Pos2 },
}

pub struct SignaturePad {
    settings: PadSettings,
    /// `None` until mounted, or when no drawing context could be allocated.
    surface: Option<Surface>,
    stroke: StrokeState,
    has_content: bool,
    /// Whether the owner currently holds a `Some` capture.
    capture_out: bool,
    on_change: CaptureCallback,
    subscription: Option<Subscription>,
    /// Bumped on every pixel change so hosts can skip redundant uploads.
    revision: u64,
}

impl SignaturePad {
    /// An unmounted pad. Call [`SignaturePad::resize`] (or [`SignaturePad::mount`])
    /// with the container width before feeding input.
    pub fn new(settings: PadSettings, on_change: impl FnMut(Option<String>) + 'static) -> Self {
        Self {
            settings,
            surface: None,
            stroke: StrokeState::Idle,
            has_content: false,
            capture_out: false,
            on_change: Box::new(on_change),
            subscription: None,
            revision: 0,
        }
    }

    /// Mount inside a container of `container_width` and follow `hub` for
    /// later width changes until the pad is dropped.
    pub fn mount(
        settings: PadSettings,
        hub: &ResizeHub,
        container_width: u32,
        on_change: impl FnMut(Option<String>) + 'static,
    ) -> Self {
        let mut pad = Self::new(settings, on_change);
        pad.subscription = Some(hub.subscribe());
        pad.resize(container_width);
        pad
    }

    /// Apply the width most recently notified through the hub, if any.
    /// Returns true when the surface was reallocated.
    pub fn poll_resize(&mut self) -> bool {
        let pending = self.subscription.as_ref().and_then(Subscription::take);
        match pending {
            Some(width) => {
                self.resize(width);
                true
            }
            None => false,
        }
    }

    /// Reallocate the surface at `container_width × height` and fill it with
    /// the background. Prior pixels are lost; an in-progress stroke is dropped.
    pub fn resize(&mut self, container_width: u32) {
        self.surface = Surface::allocate(
            container_width,
            self.settings.height,
            self.settings.background,
        );
        self.revision = self.revision.wrapping_add(1);
        self.stroke = StrokeState::Idle;

        match &self.surface {
            Some(s) => {
                log_info!("Signature surface resized to {}x{}", s.width(), s.height());
            }
            None => {
                log_warn!(
                    "No drawing context for {}x{}; signature pad is inactive",
                    container_width,
                    self.settings.height
                );
            }
        }

        if self.settings.resize_policy == ResizePolicy::ResetCapture {
            self.has_content = false;
            if self.capture_out {
                self.emit(None);
            }
        }
    }

    /// Route a host event to begin / extend / end.
    pub fn handle(&mut self, event: &InputEvent, bounds: Rect) -> Gesture {
        match event {
            InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. } => self.begin(event, bounds),
            InputEvent::PointerMove { .. } | InputEvent::TouchMove { .. } => self.extend(event, bounds),
            InputEvent::PointerUp | InputEvent::PointerLeave | InputEvent::TouchEnd => {
                self.end();
                Gesture::Passthrough
            }
        }
    }

    /// Start a stroke at the event's local position. Nothing is painted until
    /// the first extend.
    pub fn begin(&mut self, source: &impl PointerSource, bounds: Rect) -> Gesture {
        let Some(pos) = resolve_local(source, bounds) else {
            return Gesture::Consumed;
        };
        self.stroke = StrokeState::Drawing { last: pos };
        Gesture::Consumed
    }

    /// Draw a segment from the last point to the event's local position.
    pub fn extend(&mut self, source: &impl PointerSource, bounds: Rect) -> Gesture {
        let StrokeState::Drawing { last } = self.stroke else {
            return Gesture::Consumed;
        };
        let Some(pos) = resolve_local(source, bounds) else {
            return Gesture::Consumed;
        };
        if let Some(surface) = self.surface.as_mut() {
            surface.stroke_segment(last, pos, &self.settings.pen());
            self.revision = self.revision.wrapping_add(1);
        }
        self.stroke = StrokeState::Drawing { last: pos };
        Gesture::Consumed
    }

    /// Finish the stroke and emit the encoded surface. Ignored when idle.
    pub fn end(&mut self) {
        if self.stroke == StrokeState::Idle {
            return;
        }
        self.stroke = StrokeState::Idle;

        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        self.has_content = true;
        match capture::to_data_url(surface.image()) {
            Ok(url) => {
                log_info!("Signature stroke captured ({} bytes)", url.len());
                self.emit(Some(url));
            }
            Err(e) => {
                log_err!("Failed to encode signature: {}", e);
            }
        }
    }

    /// Erase to the background and emit `None`.
    pub fn clear(&mut self) {
        self.stroke = StrokeState::Idle;
        self.has_content = false;
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.fill_background();
        self.revision = self.revision.wrapping_add(1);
        log_info!("Signature cleared");
        self.emit(None);
    }

    fn emit(&mut self, value: Option<String>) {
        self.capture_out = value.is_some();
        (self.on_change)(value);
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// The "Sign here" prompt shows until a stroke is finished.
    pub fn placeholder_visible(&self) -> bool {
        !self.has_content
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.stroke, StrokeState::Drawing { .. })
    }

    pub fn stroke_state(&self) -> StrokeState {
        self.stroke
    }

    /// True when mounted without a drawing context.
    pub fn is_degraded(&self) -> bool {
        self.surface.is_none()
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn settings(&self) -> &PadSettings {
        &self.settings
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<Option<String>>>>;

    fn pad_with(settings: PadSettings, width: u32) -> (SignaturePad, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let mut pad = SignaturePad::new(settings, move |v| sink.borrow_mut().push(v));
        pad.resize(width);
        (pad, log)
    }

    fn origin() -> Rect {
        Rect::from_min_size(Pos2::ZERO, vec2(320.0, 200.0))
    }

    fn down(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown { pos: Pos2::new(x, y) }
    }

    fn mv(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove { pos: Pos2::new(x, y) }
    }

    fn draw_line(pad: &mut SignaturePad) {
        pad.handle(&down(20.0, 100.0), origin());
        pad.handle(&mv(200.0, 100.0), origin());
        pad.handle(&InputEvent::PointerUp, origin());
    }

    #[test]
    fn fresh_pad_shows_placeholder() {
        let (pad, log) = pad_with(PadSettings::default(), 320);
        assert!(!pad.has_content());
        assert!(pad.placeholder_visible());
        assert_eq!(pad.stroke_state(), StrokeState::Idle);
        assert!(pad.surface().unwrap().is_blank());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn surface_follows_container_width_and_fixed_height() {
        let (mut pad, _) = pad_with(PadSettings::default(), 320);
        assert_eq!(pad.surface().map(|s| (s.width(), s.height())), Some((320, 200)));
        pad.resize(512);
        assert_eq!(pad.surface().map(|s| (s.width(), s.height())), Some((512, 200)));
    }

    #[test]
    fn completed_stroke_emits_once() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        draw_line(&mut pad);
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].is_some());
        assert!(pad.has_content());
        assert!(!pad.placeholder_visible());
    }

    #[test]
    fn begin_and_extend_consume_default_gestures() {
        let (mut pad, _) = pad_with(PadSettings::default(), 320);
        assert_eq!(pad.handle(&mv(5.0, 5.0), origin()), Gesture::Consumed);
        assert_eq!(pad.handle(&down(5.0, 5.0), origin()), Gesture::Consumed);
        assert_eq!(pad.handle(&InputEvent::PointerUp, origin()), Gesture::Passthrough);
    }

    #[test]
    fn press_without_move_paints_nothing_but_still_emits() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        pad.handle(&down(50.0, 50.0), origin());
        pad.handle(&InputEvent::PointerUp, origin());
        assert!(pad.surface().unwrap().is_blank());
        assert_eq!(log.borrow().len(), 1);
        assert!(pad.has_content());
    }

    #[test]
    fn move_while_idle_is_ignored() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        let before = pad.revision();
        pad.handle(&mv(10.0, 10.0), origin());
        pad.handle(&mv(100.0, 100.0), origin());
        assert!(pad.surface().unwrap().is_blank());
        assert_eq!(pad.revision(), before);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn end_while_idle_is_ignored() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        pad.end();
        pad.handle(&InputEvent::PointerLeave, origin());
        pad.handle(&InputEvent::TouchEnd, origin());
        assert!(log.borrow().is_empty());
        assert!(!pad.has_content());
    }

    #[test]
    fn leave_finalizes_like_up() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        pad.handle(&down(20.0, 20.0), origin());
        pad.handle(&mv(80.0, 60.0), origin());
        pad.handle(&InputEvent::PointerLeave, origin());
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].is_some());
        assert_eq!(pad.stroke_state(), StrokeState::Idle);

        // The release that follows outside the surface is a no-op.
        pad.handle(&InputEvent::PointerUp, origin());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn clear_emits_none_and_blanks() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        draw_line(&mut pad);
        pad.clear();
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(log.borrow()[1], None);
        assert!(!pad.has_content());
        assert!(pad.placeholder_visible());
        assert!(pad.surface().unwrap().is_blank());

        pad.clear();
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn touch_strokes_use_first_touch_and_bounds_offset() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        let bounds = Rect::from_min_size(Pos2::new(10.0, 20.0), vec2(320.0, 200.0));
        pad.handle(
            &InputEvent::TouchStart { touches: vec![Pos2::new(15.0, 25.0), Pos2::new(300.0, 180.0)] },
            bounds,
        );
        assert_eq!(pad.stroke_state(), StrokeState::Drawing { last: Pos2::new(5.0, 5.0) });
        pad.handle(&InputEvent::TouchMove { touches: vec![Pos2::new(110.0, 25.0)] }, bounds);
        pad.handle(&InputEvent::TouchEnd, bounds);

        let s = pad.surface().unwrap();
        assert!(s.pixel(50, 4).unwrap()[0] < 64);
        // The second touch point never draws.
        assert_eq!(s.pixel(290, 160), Some(s.background()));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn resize_resets_capture_by_default() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        draw_line(&mut pad);
        pad.resize(280);
        assert!(pad.surface().unwrap().is_blank());
        assert!(!pad.has_content());
        assert_eq!(log.borrow().last(), Some(&None));
        assert_eq!(log.borrow().len(), 2);

        // Nothing captured any more, so another resize stays silent.
        pad.resize(300);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn keep_policy_only_blanks_pixels() {
        let settings = PadSettings { resize_policy: ResizePolicy::KeepCapture, ..PadSettings::default() };
        let (mut pad, log) = pad_with(settings, 320);
        draw_line(&mut pad);
        pad.resize(280);
        assert!(pad.surface().unwrap().is_blank());
        assert!(pad.has_content());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn resize_mid_stroke_drops_the_stroke() {
        let (mut pad, log) = pad_with(PadSettings::default(), 320);
        pad.handle(&down(10.0, 10.0), origin());
        pad.resize(300);
        assert_eq!(pad.stroke_state(), StrokeState::Idle);
        pad.handle(&mv(100.0, 100.0), origin());
        pad.handle(&InputEvent::PointerUp, origin());
        assert!(pad.surface().unwrap().is_blank());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn degraded_pad_is_inert() {
        let (mut pad, log) = pad_with(PadSettings::default(), 0);
        assert!(pad.is_degraded());
        pad.handle(&down(1.0, 1.0), origin());
        assert!(pad.is_drawing());
        pad.handle(&mv(50.0, 50.0), origin());
        pad.handle(&InputEvent::PointerUp, origin());
        pad.clear();
        assert!(log.borrow().is_empty());
        assert!(!pad.has_content());
        assert!(pad.placeholder_visible());
    }

    #[test]
    fn hub_notifications_reallocate_and_drop_releases_listener() {
        let hub = ResizeHub::new();
        let pad_log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pad_log);
        let mut pad = SignaturePad::mount(PadSettings::default(), &hub, 320, move |v| {
            sink.borrow_mut().push(v)
        });
        assert_eq!(hub.listener_count(), 1);
        assert!(!pad.poll_resize());

        hub.notify(640);
        assert!(pad.poll_resize());
        assert_eq!(pad.surface().map(|s| s.width()), Some(640));

        drop(pad);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn captured_png_matches_the_surface() {
        let (mut pad, log) = pad_with(PadSettings::default(), 160);
        draw_line(&mut pad);
        let url = log.borrow()[0].clone().unwrap();
        let decoded = capture::decode_image(&url).unwrap();
        assert_eq!(&decoded, pad.surface().unwrap().image());
    }
}
