use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui;

use crate::cli::write_png;
use crate::i18n;
use crate::pad::SignaturePad;
use crate::settings::PadSettings;
use crate::widget::SignaturePadWidget;

/// Desktop host: the inspector signature card of the asset-return form.
pub struct SignPadApp {
    widget: SignaturePadWidget,
    /// Latest value from the pad's capture callback.
    capture: Rc<RefCell<Option<String>>>,
    status: Option<String>,
    settings: PadSettings,
}

impl SignPadApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: PadSettings) -> Self {
        let capture = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&capture);
        let pad = SignaturePad::new(settings.clone(), move |value| *sink.borrow_mut() = value);
        Self {
            widget: SignaturePadWidget::new(pad),
            capture,
            status: None,
            settings,
        }
    }

    fn language_picker(&mut self, ui: &mut egui::Ui) {
        let current = i18n::current_language();
        let mut selected = current.clone();
        let current_name = i18n::LANGUAGES
            .iter()
            .find(|(code, _)| *code == current)
            .map_or(current.as_str(), |(_, name)| *name);

        // Right-to-left row: the picker sits right of its label.
        egui::ComboBox::from_id_source("language")
            .selected_text(current_name)
            .show_ui(ui, |ui| {
                for (code, name) in i18n::LANGUAGES {
                    ui.selectable_value(&mut selected, code.to_string(), *name);
                }
            });
        ui.label(t!("settings.language"));

        if selected != current {
            i18n::set_language(&selected);
            ui.ctx()
                .send_viewport_cmd(egui::ViewportCommand::Title(t!("app.title")));
            log_info!("Language changed to {}", selected);
            self.settings.language = selected;
            self.settings.save();
        }
    }

    fn save_capture(&mut self) {
        let Some(url) = self.capture.borrow().clone() else { return };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name("signature.png")
            .save_file()
        else {
            return;
        };
        self.status = Some(match write_png(&url, &path) {
            Ok(()) => {
                log_info!("Signature saved to {}", path.display());
                t!("status.saved", path = path.display())
            }
            Err(e) => {
                log_err!("Signature save failed: {}", e);
                t!("status.save_failed", error = e)
            }
        });
    }
}

impl eframe::App for SignPadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(t!("app.heading"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.language_picker(ui);
                });
            });
            ui.add_space(8.0);

            self.widget.show(ui);
            ui.add_space(8.0);

            let captured_len = self.capture.borrow().as_ref().map(String::len);
            ui.horizontal(|ui| {
                match captured_len {
                    Some(bytes) => ui.label(t!("status.captured", bytes = bytes)),
                    None => ui.label(t!("status.empty")),
                };
                let save = ui.add_enabled(captured_len.is_some(), egui::Button::new(t!("action.save")));
                if save.clicked() {
                    self.save_capture();
                }
            });

            if let Some(status) = &self.status {
                ui.small(status.as_str());
            }
        });
    }
}
