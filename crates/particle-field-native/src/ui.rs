use eframe::egui;
use rfd::FileDialog;

use crate::app::ParticleFieldApp;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "flac", "m4a", "aac"];

impl ParticleFieldApp {
    pub fn draw_transport(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("📂 Upload").clicked() {
                self.pick_track();
            }

            let label = if self.player.is_playing() { "⏸ Pause" } else { "▶ Play" };
            let toggle = ui.add_enabled(self.player.has_track(), egui::Button::new(label));
            if toggle.clicked() {
                self.toggle_playback();
            }

            ui.separator();
            match self.player.track().and_then(|p| p.file_name()) {
                Some(name) => ui.label(name.to_string_lossy().into_owned()),
                None => ui.weak("No track selected"),
            };
        });
    }

    fn pick_track(&mut self) {
        let picked = FileDialog::new()
            .add_filter("Audio", AUDIO_EXTENSIONS)
            .set_title("Select an audio file")
            .pick_file();
        if let Some(path) = picked {
            self.player.load(path);
            self.analyser.reset();
        }
    }
}
