use bevy::prelude::*;


pub const DEFAULT_FPS: u32 = 16;


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRequest {
    pub frame_index: usize,
    pub url: String,
    sequence: u64,
}


#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameLoadError {
    pub url: String,
    pub reason: String,
}

impl std::fmt::Display for FrameLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to load `{}`: {}", self.url, self.reason)
    }
}

impl std::error::Error for FrameLoadError {}


#[derive(Clone, Debug, PartialEq)]
pub struct LoadedFrame<T> {
    pub frame_index: usize,
    pub total_frames: usize,
    pub payload: T,
}


/// Playback cursor over an ordered list of frame sources.
///
/// Loads are single flight: while one is pending every further seek is
/// dropped, not queued. The player never performs a load itself; seeks and
/// ticks hand back a [`FrameRequest`] and the host reports the result through
/// [`FramePlayer::complete_load`]. Times are in milliseconds.
#[derive(Debug, Resource)]
pub struct FramePlayer {
    frame_urls: Vec<String>,
    current_frame: usize,
    fps: u32,
    frame_time_ms: f64,
    is_playing: bool,
    pending: Option<usize>,
    last_tick_ms: f64,
    sequence: u64,
}

impl Default for FramePlayer {
    fn default() -> Self {
        Self {
            frame_urls: Vec::new(),
            current_frame: 0,
            fps: DEFAULT_FPS,
            frame_time_ms: 1000.0 / DEFAULT_FPS as f64,
            is_playing: false,
            pending: None,
            last_tick_ms: 0.0,
            sequence: 0,
        }
    }
}

impl FramePlayer {
    pub fn frame_urls(&self) -> &[String] {
        &self.frame_urls
    }

    pub fn total_frames(&self) -> usize {
        self.frame_urls.len()
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time_ms
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_tick_ms(&self) -> f64 {
        self.last_tick_ms
    }

    /// Replaces the sequence, stops playback and requests frame 0.
    ///
    /// A load still pending from the previous sequence is forgotten; its
    /// completion is ignored.
    pub fn initialize(&mut self, frame_urls: Vec<String>, fps: f32) -> Option<FrameRequest> {
        info!(frames = frame_urls.len(), fps, "initializing frame sequence");

        self.frame_urls = frame_urls;
        self.set_fps(fps);
        self.current_frame = 0;
        self.is_playing = false;
        self.pending = None;
        self.sequence += 1;

        self.seek_to_frame(0)
    }

    /// Floors to 1 fps. A tick already measured is not re-evaluated.
    pub fn set_fps(&mut self, fps: f32) {
        self.fps = (fps as u32).max(1);
        self.frame_time_ms = 1000.0 / self.fps as f64;
    }

    pub fn play(&mut self, now_ms: f64) -> bool {
        if self.is_playing || self.frame_urls.is_empty() {
            return false;
        }

        self.is_playing = true;
        self.last_tick_ms = now_ms;

        true
    }

    pub fn pause(&mut self) {
        self.is_playing = false;
    }

    /// Forgets the in-flight load so the next seek is issued; its completion is ignored.
    pub fn abandon_load(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(frame = pending, "abandoning frame load");
        }

        self.sequence += 1;
    }

    pub fn stop(&mut self) -> Option<FrameRequest> {
        self.pause();
        self.seek_to_frame(0)
    }

    pub fn next_frame(&mut self) -> Option<FrameRequest> {
        let total = self.total_frames();
        if total == 0 {
            return None;
        }

        self.seek_to_frame((self.current_frame + 1) % total)
    }

    pub fn previous_frame(&mut self) -> Option<FrameRequest> {
        let total = self.total_frames();
        if total == 0 {
            return None;
        }

        self.seek_to_frame((self.current_frame + total - 1) % total)
    }

    pub fn seek_to_frame(&mut self, frame_index: usize) -> Option<FrameRequest> {
        let total = self.total_frames();
        if total == 0 {
            return None;
        }

        let frame_index = frame_index.min(total - 1);

        if let Some(pending) = self.pending {
            debug!(pending, dropped = frame_index, "frame load in flight, dropping seek");
            return None;
        }

        self.pending = Some(frame_index);

        Some(FrameRequest {
            frame_index,
            url: self.frame_urls[frame_index].clone(),
            sequence: self.sequence,
        })
    }

    /// One scheduling pass. Crossing one or more frame boundaries issues a
    /// single seek to the frame reached; skipped frames are never loaded and
    /// the sub-frame remainder carries over to the next pass.
    pub fn tick(&mut self, now_ms: f64) -> Option<FrameRequest> {
        let total = self.total_frames();
        if !self.is_playing || total == 0 {
            return None;
        }

        let delta = now_ms - self.last_tick_ms;
        if delta < self.frame_time_ms {
            return None;
        }

        let frames_to_advance = (delta / self.frame_time_ms).floor();
        self.last_tick_ms += frames_to_advance * self.frame_time_ms;

        let target = (self.current_frame + frames_to_advance as usize) % total;

        self.seek_to_frame(target)
    }

    /// Settles a request. Always releases the in-flight slot of the current
    /// sequence, success or not.
    pub fn complete_load<T>(
        &mut self,
        request: &FrameRequest,
        result: Result<T, FrameLoadError>,
    ) -> Option<LoadedFrame<T>> {
        if request.sequence != self.sequence {
            debug!(frame = request.frame_index, "ignoring frame from a replaced sequence");
            return None;
        }

        self.pending = None;

        match result {
            Ok(payload) => {
                self.current_frame = request.frame_index;

                Some(LoadedFrame {
                    frame_index: request.frame_index,
                    total_frames: self.total_frames(),
                    payload,
                })
            },
            Err(err) => {
                error!(frame = request.frame_index, "{err}");
                None
            },
        }
    }
}
