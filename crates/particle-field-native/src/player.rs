use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::analyser::FFT_SIZE;
use crate::tap::{SampleTap, TapSource};

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("no audio output device: {0}")]
    Output(#[from] rodio::StreamError),
    #[error("could not open track: {0}")]
    Open(#[from] std::io::Error),
    #[error("could not decode track: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    #[error("could not create sink: {0}")]
    Sink(#[from] rodio::PlayError),
}

/// Single-track file player. The decoded stream is routed through a
/// [`SampleTap`] the first time a track is played; later play/pause toggles
/// reuse the same sink.
pub struct Player {
    output: Option<(OutputStream, OutputStreamHandle)>,
    sink: Option<Sink>,
    tap: SampleTap,
    track: Option<PathBuf>,
    graph_connected: bool,
    playing: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            output: None,
            sink: None,
            tap: SampleTap::new(FFT_SIZE * 4),
            track: None,
            graph_connected: false,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn has_track(&self) -> bool {
        self.track.is_some()
    }

    pub fn track(&self) -> Option<&Path> {
        self.track.as_deref()
    }

    pub fn tap(&self) -> &SampleTap {
        &self.tap
    }

    /// Replace the current track. Playback stops; nothing is decoded until
    /// the next [`Player::toggle`].
    pub fn load(&mut self, path: PathBuf) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        log::info!("loaded track {}", path.display());
        self.track = Some(path);
        self.graph_connected = false;
        self.playing = false;
        self.tap.clear();
    }

    /// Play when paused, pause when playing. Without a track this does
    /// nothing.
    ///
    /// # Errors
    /// Any failure to reach the output device or decode the track. The player
    /// is left paused.
    pub fn toggle(&mut self) -> Result<(), PlayerError> {
        if self.playing {
            if let Some(sink) = &self.sink {
                sink.pause();
            }
            self.playing = false;
            return Ok(());
        }
        let Some(path) = self.track.clone() else {
            return Ok(());
        };
        if !self.graph_connected {
            self.connect(&path)?;
        }
        if let Some(sink) = &self.sink {
            sink.play();
        }
        self.playing = true;
        Ok(())
    }

    fn connect(&mut self, path: &Path) -> Result<(), PlayerError> {
        if self.output.is_none() {
            self.output = Some(OutputStream::try_default()?);
        }
        let Some((_, handle)) = &self.output else {
            return Err(PlayerError::Output(rodio::StreamError::NoDevice));
        };
        let decoder = Decoder::new(BufReader::new(File::open(path)?))?;
        let sink = Sink::try_new(handle)?;
        sink.append(TapSource::new(decoder.convert_samples::<f32>(), self.tap.clone()));
        self.sink = Some(sink);
        self.graph_connected = true;
        log::debug!("audio graph connected for {}", path.display());
        Ok(())
    }

    /// Notice the end of the track. Returns `true` on the call that flips
    /// playing off; the next toggle starts the track from the beginning.
    pub fn poll_ended(&mut self) -> bool {
        let drained = self.sink.as_ref().is_some_and(Sink::empty);
        if !(self.playing && drained) {
            return false;
        }
        self.sink = None;
        self.graph_connected = false;
        self.playing = false;
        self.tap.clear();
        log::info!("track ended");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_without_a_track_stays_paused() {
        let mut player = Player::new();
        assert!(!player.has_track());
        player.toggle().unwrap();
        assert!(!player.is_playing());
        assert!(!player.poll_ended());
    }

    #[test]
    fn loading_resets_playback() {
        let mut player = Player::new();
        player.tap().push(0.5);
        player.load(PathBuf::from("song.mp3"));
        assert!(player.has_track());
        assert!(!player.is_playing());
        assert_eq!(player.track(), Some(Path::new("song.mp3")));
        assert!(player.tap().latest(FFT_SIZE).is_empty());
    }
}
