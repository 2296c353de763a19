// Byte spectrum in the style of a browser AnalyserNode: Blackman window,
// magnitude spectrum, exponential smoothing over time, then decibels mapped
// onto 0..=255.
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::TAU;
use std::sync::Arc;

pub const FFT_SIZE: usize = 256;

pub struct SpectrumAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
    analysed_frame: Option<u64>,
    pub smoothing: f32,
    pub min_db: f32,
    pub max_db: f32,
}

impl SpectrumAnalyser {
    pub fn new(fft_size: usize) -> Self {
        let fft = FftPlanner::<f32>::new().plan_fft_forward(fft_size);
        let bins = fft_size / 2;
        Self {
            fft,
            window: blackman(fft_size),
            scratch: vec![Complex::default(); fft_size],
            smoothed: vec![0.0; bins],
            bytes: vec![0; bins],
            analysed_frame: None,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }

    /// Analyse the most recent mono samples. Shorter input is zero-padded at
    /// the front, longer input is cut to its newest `fft_size` samples.
    pub fn update(&mut self, samples: &[f32]) -> &[u8] {
        let n = self.window.len();
        let recent = &samples[samples.len().saturating_sub(n)..];
        let pad = n - recent.len();
        for (i, slot) in self.scratch.iter_mut().enumerate() {
            let s = if i < pad { 0.0 } else { recent[i - pad] };
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.scratch);

        let range = self.max_db - self.min_db;
        for (k, (smooth, byte)) in self.smoothed.iter_mut().zip(self.bytes.iter_mut()).enumerate() {
            let magnitude = self.scratch[k].norm() / n as f32;
            *smooth = self.smoothing * *smooth + (1.0 - self.smoothing) * magnitude;
            let db = 20.0 * smooth.log10();
            let scaled = (255.0 / range * (db - self.min_db)).floor();
            // -inf dB (silence) lands on 0 through the clamp
            *byte = if scaled.is_nan() { 0 } else { scaled.clamp(0.0, 255.0) as u8 };
        }
        &self.bytes
    }

    /// [`Self::update`] at most once per displayed frame. Repeat passes of
    /// the same frame get the spectrum already computed for it, so the
    /// smoothing advances once per frame.
    pub fn update_for_frame(&mut self, frame_nr: u64, samples: &[f32]) -> &[u8] {
        if self.analysed_frame != Some(frame_nr) {
            self.analysed_frame = Some(frame_nr);
            self.update(samples);
        }
        &self.bytes
    }

    pub fn reset(&mut self) {
        self.analysed_frame = None;
        self.smoothed.iter_mut().for_each(|v| *v = 0.0);
        self.bytes.iter_mut().for_each(|v| *v = 0);
    }
}

fn blackman(n: usize) -> Vec<f32> {
    let (a0, a1, a2) = (0.42, 0.5, 0.08);
    (0..n)
        .map(|i| {
            let x = i as f32 / n as f32;
            a0 - a1 * (TAU * x).cos() + a2 * (2.0 * TAU * x).cos()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(bin: usize, amplitude: f32) -> Vec<f32> {
        (0..FFT_SIZE)
            .map(|i| amplitude * (TAU * bin as f32 * i as f32 / FFT_SIZE as f32).sin())
            .collect()
    }

    #[test]
    fn silence_maps_to_zero() {
        let mut a = SpectrumAnalyser::new(FFT_SIZE);
        let bytes = a.update(&[0.0; FFT_SIZE]);
        assert_eq!(bytes.len(), 128);
        assert!(bytes.iter().all(|&b| b == 0));
        // nothing buffered yet also counts as silence
        assert!(a.update(&[]).iter().all(|&b| b == 0));
    }

    #[test]
    fn tone_peaks_in_its_bin() {
        let mut a = SpectrumAnalyser::new(FFT_SIZE);
        let tone = sine(16, 0.01);
        for _ in 0..19 {
            a.update(&tone);
        }
        let bytes = a.update(&tone);
        let peak = (0..bytes.len()).max_by_key(|&k| bytes[k]).unwrap();
        assert_eq!(peak, 16);
        assert!(bytes[16] > bytes[15] && bytes[16] > bytes[17]);
        assert_eq!(bytes[100], 0);
    }

    #[test]
    fn smoothing_lets_peaks_decay() {
        let mut a = SpectrumAnalyser::new(FFT_SIZE);
        let tone = sine(8, 0.01);
        for _ in 0..19 {
            a.update(&tone);
        }
        let loud = a.update(&tone)[8];
        let after = a.update(&[0.0; FFT_SIZE])[8];
        assert!(after < loud && after > 0, "{after} vs {loud}");
        a.reset();
        assert!(a.update(&[0.0; FFT_SIZE]).iter().all(|&b| b == 0));
    }

    #[test]
    fn repeat_passes_of_a_frame_do_not_smooth_twice() {
        let mut a = SpectrumAnalyser::new(FFT_SIZE);
        let tone = sine(16, 0.01);
        let first = a.update_for_frame(7, &tone).to_vec();
        assert_eq!(a.update_for_frame(7, &tone), &first[..]);
        assert_eq!(a.update_for_frame(7, &[0.0; FFT_SIZE]), &first[..]);

        let next = a.update_for_frame(8, &tone)[16];
        assert!(next > first[16], "{next} vs {}", first[16]);
    }
}
