//! Headless playback state machine
//!
//! Drives a frame source the way an interactive player would, without
//! rendering or key handling. Callers feed it ticks and events and read back
//! the current frame and position.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::errors::DomainError;
use crate::domain::model::VideoProperties;
use crate::engine::frame::Frame;
use crate::ports::FrameSource;
use crate::utils::format_mm_ss;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Playing,
    Paused,
    /// Quit was requested; the source has been released
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    TogglePause,
    StepForward,
    StepBackward,
    Quit,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Position or state changed
    Applied,
    /// Step ignored, already on the first frame
    AtFirstFrame,
    /// Step ignored, already on the last frame
    AtLastFrame,
    Stopped,
}

/// Player over its own frame source.
///
/// The session never shares a cursor: it owns the source it was given and
/// closes it on quit or drop.
pub struct PlaybackSession {
    source: Box<dyn FrameSource>,
    properties: VideoProperties,
    state: PlaybackState,
    current_frame: u64,
    // Frame at `current_frame` once decoded; the cursor then sits one past it
    shown: Option<Frame>,
}

impl PlaybackSession {
    /// Start playing `source` from its first frame
    pub fn new(mut source: Box<dyn FrameSource>) -> Result<Self, DomainError> {
        source.seek(0)?;
        let properties = source.properties();
        info!(
            "Playback of {} ({} frames @ {:.2} fps)",
            source.path(),
            properties.frame_count,
            properties.frame_rate
        );
        Ok(Self {
            source,
            properties,
            state: PlaybackState::Playing,
            current_frame: 0,
            shown: None,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Index of the frame last shown (or about to be shown when paused)
    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    pub fn total_frames(&self) -> u64 {
        self.properties.frame_count
    }

    /// Seconds into the video, 0 when the frame rate is unknown
    pub fn current_time(&self) -> f64 {
        self.current_frame as f64 * self.properties.frame_duration()
    }

    /// Advance one display step.
    ///
    /// Playing reads the next frame. At end of stream playback pauses and
    /// rewinds to frame 0, returning `None`. Paused returns the frame on
    /// screen, decoding it only the first time after a jump.
    pub fn tick(&mut self) -> Result<Option<&Frame>, DomainError> {
        match self.state {
            PlaybackState::Stopped => Ok(None),
            PlaybackState::Playing => {
                let index = self.source.position();
                match self.source.read_next()? {
                    Some(frame) => {
                        self.current_frame = index;
                        self.shown = Some(frame);
                        Ok(self.shown.as_ref())
                    }
                    None => {
                        info!("End of video, returning to start");
                        self.state = PlaybackState::Paused;
                        self.jump_to(0)?;
                        Ok(None)
                    }
                }
            }
            PlaybackState::Paused => {
                if self.shown.is_none() {
                    self.shown = self.source.read_next()?;
                }
                Ok(self.shown.as_ref())
            }
        }
    }

    pub fn handle(&mut self, event: PlaybackEvent) -> Result<EventOutcome, DomainError> {
        if self.state == PlaybackState::Stopped {
            return Ok(EventOutcome::Stopped);
        }

        match event {
            PlaybackEvent::TogglePause => {
                self.state = match self.state {
                    PlaybackState::Playing => PlaybackState::Paused,
                    _ => PlaybackState::Playing,
                };
                if self.is_playing() && self.shown.is_none() {
                    // Resume from the frame after the one on screen.
                    self.shown = self.source.read_next()?;
                }
                debug!("Playback {:?}", self.state);
                Ok(EventOutcome::Applied)
            }
            PlaybackEvent::StepForward => {
                self.state = PlaybackState::Paused;
                if self.current_frame + 1 >= self.total_frames() {
                    debug!("Already at last frame");
                    return Ok(EventOutcome::AtLastFrame);
                }
                self.jump_to(self.current_frame + 1)?;
                Ok(EventOutcome::Applied)
            }
            PlaybackEvent::StepBackward => {
                self.state = PlaybackState::Paused;
                if self.current_frame == 0 {
                    debug!("Already at first frame");
                    return Ok(EventOutcome::AtFirstFrame);
                }
                self.jump_to(self.current_frame - 1)?;
                Ok(EventOutcome::Applied)
            }
            PlaybackEvent::Quit => {
                self.state = PlaybackState::Stopped;
                self.shown = None;
                self.source.close();
                Ok(EventOutcome::Stopped)
            }
        }
    }

    /// `Frame: i / n  Time: MM:SS / MM:SS`
    pub fn info_line(&self) -> String {
        format!(
            "Frame: {} / {}  Time: {} / {}",
            self.current_frame,
            self.total_frames(),
            format_mm_ss(self.current_time()),
            format_mm_ss(self.properties.duration_seconds)
        )
    }

    fn jump_to(&mut self, frame_index: u64) -> Result<(), DomainError> {
        let last = self.total_frames().saturating_sub(1);
        self.current_frame = frame_index.min(last);
        self.shown = None;
        self.source.seek(self.current_frame)
    }
}

impl fmt::Display for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self.state {
            PlaybackState::Playing => "PLAYING",
            PlaybackState::Paused => "PAUSED",
            PlaybackState::Stopped => "STOPPED",
        };
        write!(f, "{}  {}", status, self.info_line())
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.source.close();
    }
}
