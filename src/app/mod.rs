// Application layer - Use case interactors

pub mod compress_interactor;
pub mod inspect_interactor;
pub mod playback;

// Re-export interactors
pub use compress_interactor::{CompressInteractor, CompressionReport, OutputTarget};
pub use inspect_interactor::InspectInteractor;
pub use playback::{PlaybackEvent, PlaybackSession, PlaybackState};
