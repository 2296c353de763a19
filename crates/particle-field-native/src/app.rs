use eframe::egui::{self, Color32};
use particle_field::{FrameInput, ParticleFieldView, VisualizerConfig};

use crate::analyser::{SpectrumAnalyser, FFT_SIZE};
use crate::player::Player;

pub struct ParticleFieldApp {
    pub view: ParticleFieldView,
    pub player: Player,
    pub analyser: SpectrumAnalyser,
}

impl ParticleFieldApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: VisualizerConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            view: ParticleFieldView::new(&cc.egui_ctx, config),
            player: Player::new(),
            analyser: SpectrumAnalyser::new(FFT_SIZE),
        }
    }

    pub fn toggle_playback(&mut self) {
        if let Err(err) = self.player.toggle() {
            log::error!("playback failed: {err}");
        }
    }
}

impl eframe::App for ParticleFieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.player.poll_ended() {
            self.analyser.reset();
        }

        egui::TopBottomPanel::top("transport").show(ctx, |ui| self.draw_transport(ui));

        let playing = self.player.is_playing();
        let elapsed = ctx.input(|i| i.stable_dt);
        let spectrum = if playing {
            let recent = self.player.tap().latest(FFT_SIZE);
            Some(self.analyser.update_for_frame(ctx.cumulative_frame_nr(), &recent))
        } else {
            None
        };

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let input = FrameInput { playing, samples: spectrum, elapsed: Some(elapsed) };
                self.view.show(ui, input);
            });
    }
}
