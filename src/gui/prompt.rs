use eframe::egui;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    Pending,
    Submitted(String),
    Cancelled,
}

/// Single-line text prompt window. Shown every frame until it resolves;
/// the owner keeps the canvas inert while one is open.
pub struct TextPrompt {
    title: String,
    buffer: String,
    focused: bool,
}

impl TextPrompt {
    pub fn new(title: impl Into<String>, initial: impl Into<String>) -> Self {
        Self { title: title.into(), buffer: initial.into(), focused: false }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PromptOutcome {
        let mut outcome = PromptOutcome::Pending;
        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let edit = ui.text_edit_singleline(&mut self.buffer);
                if !self.focused {
                    edit.request_focus();
                    self.focused = true;
                }
                let enter = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let escape = ui.input(|i| i.key_pressed(egui::Key::Escape));
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() || enter {
                        outcome = PromptOutcome::Submitted(self.buffer.clone());
                    }
                    if ui.button("Cancel").clicked() || escape {
                        outcome = PromptOutcome::Cancelled;
                    }
                });
            });
        outcome
    }
}
