use rodio::Source;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Bounded mono history of what the output is playing, shared between the
/// audio thread (writer) and the UI thread (reader).
#[derive(Clone)]
pub struct SampleTap {
    buffer: Arc<Mutex<VecDeque<f32>>>,
    capacity: usize,
}

impl SampleTap {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn push(&self, sample: f32) {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(sample);
    }

    /// The newest `n` samples, oldest first. Fewer if not enough have played.
    pub fn latest(&self, n: usize) -> Vec<f32> {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        let skip = buffer.len().saturating_sub(n);
        buffer.iter().skip(skip).copied().collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// Pass-through source that mixes each interleaved frame down to mono and
/// copies it into a [`SampleTap`].
pub struct TapSource<S> {
    inner: S,
    tap: SampleTap,
    frame_sum: f32,
    frame_fill: u16,
}

impl<S: Source<Item = f32>> TapSource<S> {
    pub fn new(inner: S, tap: SampleTap) -> Self {
        Self { inner, tap, frame_sum: 0.0, frame_fill: 0 }
    }
}

impl<S: Source<Item = f32>> Iterator for TapSource<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let sample = self.inner.next()?;
        let channels = self.inner.channels().max(1);
        self.frame_sum += sample;
        self.frame_fill += 1;
        if self.frame_fill >= channels {
            self.tap.push(self.frame_sum / f32::from(channels));
            self.frame_sum = 0.0;
            self.frame_fill = 0;
        }
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S: Source<Item = f32>> Source for TapSource<S> {
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}
