//! Media sink - where sound and music requests go
//!
//! The game only names cues; playback belongs to whoever implements
//! [`MediaSink`]. The terminal build has no audio, so [`LogMedia`] records
//! cues in the log.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::types::{MusicCue, SoundCue};

pub trait MediaSink: Send + 'static {
    fn play_sound(&mut self, cue: SoundCue);
    fn play_music(&mut self, cue: MusicCue);
}

/// Logs every cue at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMedia;

impl MediaSink for LogMedia {
    fn play_sound(&mut self, cue: SoundCue) {
        debug!(cue = cue.as_str(), "sound");
    }

    fn play_music(&mut self, cue: MusicCue) {
        debug!(cue = cue.as_str(), "music");
    }
}

/// Drops every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct MuteMedia;

impl MediaSink for MuteMedia {
    fn play_sound(&mut self, _cue: SoundCue) {}

    fn play_music(&mut self, _cue: MusicCue) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCue {
    Sound(SoundCue),
    Music(MusicCue),
}

/// Keeps every cue; clones share one log
#[derive(Debug, Default, Clone)]
pub struct RecordingMedia {
    log: Arc<Mutex<Vec<MediaCue>>>,
}

impl RecordingMedia {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<MediaCue> {
        self.log.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn push(&self, cue: MediaCue) {
        if let Ok(mut log) = self.log.lock() {
            log.push(cue);
        }
    }
}

impl MediaSink for RecordingMedia {
    fn play_sound(&mut self, cue: SoundCue) {
        self.push(MediaCue::Sound(cue));
    }

    fn play_music(&mut self, cue: MusicCue) {
        self.push(MediaCue::Music(cue));
    }
}
