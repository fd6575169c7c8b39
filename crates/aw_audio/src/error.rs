use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("failed to open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: symphonia::core::errors::Error,
    },
    #[error("'{}' has no playable track", .path.display())]
    NoTrack { path: PathBuf },
    #[error("no default audio output device")]
    NoDevice,
    #[error("audio output configuration: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
    #[error("unsupported output sample format {0:?}")]
    SampleFormat(cpal::SampleFormat),
}
