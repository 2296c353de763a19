//! Per-frame update of a mounted scene.
//!
//! One call to [`update_frame`] runs, strictly in order: clock and camera
//! pose, transition smoothing, spiral/ring blend, audio perturbation, cloud
//! rotation. Submission to the surface is left to the caller so the update
//! itself never touches the host.

use glam::Vec3;

use crate::config::MotionParams;
use crate::scene::VisualizerState;

/// Blend weight between the spiral (0) and the ring (1).
///
/// A first-order low-pass towards its target: it never jumps, and it
/// approaches the target geometrically without having to reach it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionState {
    progress: f32,
}

impl TransitionState {
    pub fn new(progress: f32) -> Self {
        Self { progress: progress.clamp(0.0, 1.0) }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(playing: bool) -> f32 {
        if playing {
            1.0
        } else {
            0.0
        }
    }

    pub fn step(&mut self, target: f32, factor: f32) {
        self.progress += (target - self.progress) * factor;
        self.progress = self.progress.clamp(0.0, 1.0);
    }
}

/// Smoothing factor for one frame. Frame-counted unless the config asks for
/// wall-clock scaling and the host supplied the elapsed time.
pub fn smoothing_factor(motion: &MotionParams, elapsed: Option<f32>) -> f32 {
    match elapsed {
        Some(dt) if motion.frame_rate_independent && dt.is_finite() && dt >= 0.0 => {
            1.0 - (1.0 - motion.transition_rate).powf(dt * motion.reference_fps)
        }
        _ => motion.transition_rate,
    }
}

/// Read-only snapshot of the external audio collaborators for one frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameInput<'a> {
    pub playing: bool,
    /// Byte spectrum, 0..=255 per bin. `None` or empty means no data this frame.
    pub samples: Option<&'a [u8]>,
    /// Seconds since the previous frame, if the host measures it.
    pub elapsed: Option<f32>,
}

impl<'a> FrameInput<'a> {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn playing(samples: &'a [u8]) -> Self {
        Self { playing: true, samples: Some(samples), elapsed: None }
    }

    pub fn with_elapsed(mut self, elapsed: f32) -> Self {
        self.elapsed = Some(elapsed);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub transition_progress: f32,
    pub zoom: f32,
    /// Whether spectrum data displaced the particles this frame.
    pub perturbed: bool,
}

pub fn update_frame(state: &mut VisualizerState, input: FrameInput<'_>) -> FrameReport {
    if state.swarm.is_empty() && state.stars.is_empty() {
        return report(state, false);
    }
    let motion = state.config.motion.clone();
    state.frame += 1;

    state.camera.advance(motion.time_step);
    state.camera.update_pose();

    let factor = smoothing_factor(&motion, input.elapsed);
    state.transition.step(TransitionState::target(input.playing), factor);

    let swarm = &mut state.swarm;
    blend_positions(
        &swarm.geometry.original,
        &swarm.geometry.target,
        state.transition.progress(),
        &mut swarm.positions,
    );

    let mut perturbed = false;
    if input.playing {
        match input.samples.filter(|s| !s.is_empty()) {
            Some(samples) => {
                apply_audio_perturbation(&mut swarm.positions, samples, &motion);
                perturbed = true;
                state.starved = false;
            }
            None => {
                if !state.starved {
                    log::debug!("playing without spectrum data; particles stay on the blend");
                    state.starved = true;
                }
            }
        }
    } else {
        state.starved = false;
    }

    swarm.rotate(motion.particle_spin);
    state.stars.rotate();

    let report = report(state, perturbed);
    log::trace!("{report:?}");
    report
}

fn report(state: &VisualizerState, perturbed: bool) -> FrameReport {
    FrameReport {
        frame: state.frame,
        transition_progress: state.transition.progress(),
        zoom: state.camera.zoom_speed(),
        perturbed,
    }
}

/// `out[i] = original[i]·(1−t) + target[i]·t`, written so t = 0 and t = 1
/// reproduce the endpoints exactly.
pub fn blend_positions(original: &[Vec3], target: &[Vec3], t: f32, out: &mut [Vec3]) {
    for ((out, a), b) in out.iter_mut().zip(original).zip(target) {
        *out = *a * (1.0 - t) + *b * t;
    }
}

/// Spectrum bin read by particle `index` of `count`. Matches indexing the
/// flat xyz buffer: `floor(flat / flat_len · bins)` with `flat = 3·index`.
pub fn bin_index(index: usize, count: usize, bins: usize) -> usize {
    (index * bins) / count
}

/// Push each particle away from the vertical axis by its bin's loudness and
/// nudge it up (loud) or down (quiet). Angle about the axis is preserved.
pub fn apply_audio_perturbation(positions: &mut [Vec3], samples: &[u8], motion: &MotionParams) {
    let count = positions.len();
    if samples.is_empty() {
        return;
    }
    for (i, p) in positions.iter_mut().enumerate() {
        let value = f32::from(samples[bin_index(i, count, samples.len())]) / 255.0;

        let angle = p.z.atan2(p.x);
        let radius = p.x.hypot(p.z);
        let expansion = 1.0 + value * motion.expansion_gain;

        p.x = angle.cos() * radius * expansion;
        p.z = angle.sin() * radius * expansion;
        p.y += (value - 0.5) * motion.vertical_gain;
    }
}
