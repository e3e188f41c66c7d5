//! Frame processing engine: frames, resampling, policy application and the
//! transcode loop.

pub mod frame;
pub mod pipeline;
pub mod resample;
pub mod transform;

pub use frame::Frame;
pub use pipeline::TranscodePipeline;
pub use resample::AreaResampler;
pub use transform::FrameTransformer;
