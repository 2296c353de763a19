use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisualizerError {
    /// The host offered no usable drawable region.
    #[error("no drawable surface: {width}x{height}")]
    MissingSurface { width: f32, height: f32 },

    #[error("visualizer is already mounted")]
    AlreadyMounted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
