//! Audio-reactive 3D particle field.
//!
//! A spiral galaxy of particles over a slowly turning star shell. While audio
//! plays the galaxy eases into a flat ring and each particle is pushed out by
//! the loudness of its frequency bin. The camera orbits the origin and zooms
//! with the mouse wheel.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod lifecycle;
pub mod render;
pub mod scene;
pub mod starfield;

pub use config::VisualizerConfig;
pub use error::{Result, VisualizerError};
pub use frame::{FrameInput, FrameReport};
pub use host::ParticleFieldView;
pub use lifecycle::{LifecyclePhase, Visualizer};
pub use scene::{SurfaceSize, VisualizerState};
