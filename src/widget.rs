// ============================================================================
// EGUI WIDGET — hosts a SignaturePad inside any egui::Ui
// ============================================================================

use egui::{Align, Align2, Color32, FontId, Layout, Rect, Sense, Stroke, TextureOptions};

use crate::input::InputEvent;
use crate::pad::SignaturePad;

const BORDER_COLOR: Color32 = Color32::from_rgb(203, 213, 225);
const PLACEHOLDER_COLOR: Color32 = Color32::from_rgb(148, 163, 184);

/// Signature pad plus the GPU texture mirroring its raster.
pub struct SignaturePadWidget {
    pad: SignaturePad,
    texture: Option<egui::TextureHandle>,
    /// Pad revision currently uploaded to `texture`.
    uploaded_revision: Option<u64>,
    /// Container width the surface was last allocated for.
    last_width: Option<u32>,
}

impl SignaturePadWidget {
    pub fn new(pad: SignaturePad) -> Self {
        Self {
            pad,
            texture: None,
            uploaded_revision: None,
            last_width: None,
        }
    }

    pub fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    /// Lay out the surface at the full available width, feed it this frame's
    /// pointer input, paint it, then the clear button underneath.
    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let width = ui.available_width().floor().max(0.0) as u32;
        if self.last_width != Some(width) {
            self.pad.resize(width);
            self.last_width = Some(width);
        }
        self.pad.poll_resize();

        let size = egui::vec2(width as f32, self.pad.height() as f32);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        let events = ui.input(|i| i.events.clone());
        for event in &events {
            let Some(input) = translate_event(event, rect) else { continue };
            // A press over a popup or window stacked above the pad belongs to that layer.
            if let InputEvent::PointerDown { pos } = &input
                && ui.ctx().layer_id_at(*pos) != Some(ui.layer_id())
            {
                continue;
            }
            // Sense::click_and_drag already keeps egui from scrolling the parent.
            let _ = self.pad.handle(&input, rect);
        }

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
        }

        self.sync_texture(ui.ctx());
        self.paint(ui, rect);

        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
            if ui.small_button(t!("pad.clear")).clicked() {
                self.pad.clear();
            }
        });

        response
    }

    fn sync_texture(&mut self, ctx: &egui::Context) {
        let Some(surface) = self.pad.surface() else {
            self.texture = None;
            self.uploaded_revision = None;
            return;
        };
        if self.uploaded_revision == Some(self.pad.revision()) && self.texture.is_some() {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [surface.width() as usize, surface.height() as usize],
            surface.image().as_raw(),
        );
        match self.texture.as_mut() {
            Some(tex) => tex.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("signature_pad", image, TextureOptions::LINEAR));
            }
        }
        self.uploaded_revision = Some(self.pad.revision());
    }

    /// The "Sign here" prompt. A pad without a drawing context keeps showing
    /// it, so it looks the same as a blank working pad.
    fn prompt(&self) -> Option<String> {
        self.pad.placeholder_visible().then(|| t!("pad.placeholder"))
    }

    fn paint(&self, ui: &egui::Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let bg = self.pad.settings().background;
        painter.rect_filled(rect, 6.0, Color32::from_rgb(bg[0], bg[1], bg[2]));

        if let Some(tex) = &self.texture {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(tex.id(), rect, uv, Color32::WHITE);
        }

        // Painted, not allocated: the prompt never takes pointer input.
        if let Some(prompt) = self.prompt() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                prompt,
                FontId::proportional(14.0),
                PLACEHOLDER_COLOR,
            );
        }

        painter.rect_stroke(rect.shrink(1.0), 6.0, Stroke::new(2.0, BORDER_COLOR));
    }
}

/// Translate one egui event into pad input for a surface occupying `rect`.
///
/// egui folds the first touch point into pointer events, so touch input
/// arrives here as pointer presses and moves. Moving outside `rect` reports
/// a leave; the pad ignores it unless a stroke is active.
pub fn translate_event(event: &egui::Event, rect: Rect) -> Option<InputEvent> {
    match event {
        egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed: true,
            ..
        } if rect.contains(*pos) => Some(InputEvent::PointerDown { pos: *pos }),
        egui::Event::PointerButton {
            button: egui::PointerButton::Primary,
            pressed: false,
            ..
        } => Some(InputEvent::PointerUp),
        egui::Event::PointerMoved(pos) => {
            if rect.contains(*pos) {
                Some(InputEvent::PointerMove { pos: *pos })
            } else {
                Some(InputEvent::PointerLeave)
            }
        }
        egui::Event::PointerGone => Some(InputEvent::PointerLeave),
        _ => None,
    }
}
