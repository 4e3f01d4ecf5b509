// SPDX-License-Identifier: PMPL-1.0-or-later
//! Speech output capability injected into the announcement queue.

use super::LiveAnnouncement;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Voice parameters passed with every utterance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// 0.1 (slowest) to 10.0
    pub rate: f32,
    /// 0.0 (muted) to 1.0
    pub volume: f32,
}

impl SpeechSettings {
    /// Clamp to the ranges speech engines accept
    pub fn new(rate: f32, volume: f32) -> Self {
        let rate = if rate.is_finite() { rate.clamp(0.1, 10.0) } else { 1.0 };
        let volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.7 };
        Self { rate, volume }
    }
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self::new(1.0, 0.7)
    }
}

/// Something that can voice an announcement: a TTS engine, a live region, a log
///
/// Called while the queue's lock is held; implementations must not call back
/// into the queue.
pub trait Speaker: Send + Sync {
    fn speak(&self, announcement: &LiveAnnouncement, settings: &SpeechSettings);

    /// Stop the utterance in progress, if any
    fn cancel(&self) {}
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&self, _announcement: &LiveAnnouncement, _settings: &SpeechSettings) {}
}

/// Emits each announcement as a tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSpeaker;

impl Speaker for TracingSpeaker {
    fn speak(&self, announcement: &LiveAnnouncement, settings: &SpeechSettings) {
        info!(
            id = %announcement.id,
            priority = ?announcement.priority,
            rate = settings.rate,
            volume = settings.volume,
            "announce: {}",
            announcement.message
        );
    }

    fn cancel(&self) {
        info!("announce: cancelled");
    }
}
