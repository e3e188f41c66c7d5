//! Decoded frame wrapper

use ffmpeg_next::format::Pixel;
use ffmpeg_next::util::frame::video::Video;

use crate::domain::model::Dimensions;

/// One decoded raster image.
///
/// Frames are moved through a single pipeline iteration and dropped; nothing
/// holds on to them across iterations.
pub struct Frame {
    video: Video,
}

impl Frame {
    /// Allocate a frame with the given format and size.
    ///
    /// Pixel contents are whatever the allocator returned.
    pub fn blank(format: Pixel, width: u32, height: u32) -> Self {
        Self {
            video: Video::new(format, width, height),
        }
    }

    /// Allocate a YUV 4:2:0 frame filled with a flat colour
    pub fn solid(width: u32, height: u32, luma: u8) -> Self {
        let mut frame = Self::blank(Pixel::YUV420P, width, height);
        let video = frame.as_video_mut();
        video.data_mut(0).fill(luma);
        video.data_mut(1).fill(128);
        video.data_mut(2).fill(128);
        frame
    }

    pub fn width(&self) -> u32 {
        self.video.width()
    }

    pub fn height(&self) -> u32 {
        self.video.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width(), self.height())
    }

    pub fn format(&self) -> Pixel {
        self.video.format()
    }

    pub fn as_video(&self) -> &Video {
        &self.video
    }

    pub fn as_video_mut(&mut self) -> &mut Video {
        &mut self.video
    }

    pub fn into_video(self) -> Video {
        self.video
    }
}

impl From<Video> for Frame {
    fn from(video: Video) -> Self {
        Self { video }
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("format", &self.format())
            .finish()
    }
}
