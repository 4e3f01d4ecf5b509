// SPDX-License-Identifier: PMPL-1.0-or-later
//! Live-region announcement queue.
//!
//! Models the single voice of a screen reader or a single `aria-live` region:
//! at most one announcement is active at a time. Each announcement moves
//! through `queued -> active -> delivered`, or ends `superseded` when an
//! assertive announcement interrupts it or a full queue evicts it.
//!
//! All state sits behind one mutex, so an assertive enqueue clears the active
//! slot and reorders the queue atomically with respect to `dequeue_next`.

mod speaker;

pub use speaker::{SilentSpeaker, Speaker, SpeechSettings, TracingSpeaker};

use crate::config::AnnouncementConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Announcement priority, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementPriority {
    Low,
    Medium,
    High,
    Assertive,
}

/// Live region politeness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementType {
    Polite,
    Assertive,
    Status,
    Alert,
}

/// A message for assistive technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveAnnouncement {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub message: String,
    pub priority: AnnouncementPriority,
    #[serde(rename = "type")]
    pub kind: AnnouncementType,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub context: Option<String>,
}

impl LiveAnnouncement {
    pub fn new(message: &str, priority: AnnouncementPriority, kind: AnnouncementType) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.to_string(),
            priority,
            kind,
            created_at: Utc::now(),
            context: None,
        }
    }

    /// Polite, medium-priority announcement
    pub fn polite(message: &str) -> Self {
        Self::new(message, AnnouncementPriority::Medium, AnnouncementType::Polite)
    }

    /// Assertive announcement that interrupts whatever is being spoken
    pub fn assertive(message: &str) -> Self {
        Self::new(message, AnnouncementPriority::Assertive, AnnouncementType::Assertive)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_context(mut self, context: &str) -> Self {
        self.context = Some(context.to_string());
        self
    }

    pub fn interrupts(&self) -> bool {
        self.kind == AnnouncementType::Assertive
    }
}

/// Lifecycle state of an announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementStatus {
    Queued,
    Active,
    Delivered,
    Superseded,
}

/// A finished announcement kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementRecord {
    pub announcement: LiveAnnouncement,
    pub status: AnnouncementStatus,
}

#[derive(Debug)]
struct Pending {
    announcement: LiveAnnouncement,
    seq: u64,
}

impl Pending {
    /// Interrupting items first, then priority, then age, then arrival
    fn key(&self) -> (bool, AnnouncementPriority, Reverse<DateTime<Utc>>, Reverse<u64>) {
        let a = &self.announcement;
        (a.interrupts(), a.priority, Reverse(a.created_at), Reverse(self.seq))
    }

    /// Lowest priority, then oldest
    fn eviction_key(&self) -> (bool, AnnouncementPriority, DateTime<Utc>, u64) {
        let a = &self.announcement;
        (a.interrupts(), a.priority, a.created_at, self.seq)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: BinaryHeap<Pending>,
    active: Option<LiveAnnouncement>,
    history: VecDeque<AnnouncementRecord>,
    next_seq: u64,
}

impl QueueState {
    fn retire(&mut self, announcement: LiveAnnouncement, status: AnnouncementStatus, capacity: usize) {
        self.history.push_back(AnnouncementRecord { announcement, status });
        while self.history.len() > capacity {
            if let Some(dropped) = self.history.pop_front() {
                debug!("Dropping announcement {} from history", dropped.announcement.id);
            }
        }
    }

    /// Remove and return the lowest-priority, oldest pending item
    fn evict_one(&mut self) -> Option<LiveAnnouncement> {
        let mut items = std::mem::take(&mut self.pending).into_vec();
        let victim = items
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.eviction_key())
            .map(|(i, _)| i);
        let evicted = victim.map(|i| items.swap_remove(i).announcement);
        self.pending = BinaryHeap::from(items);
        evicted
    }
}

/// Priority queue of live announcements with a single active slot
pub struct AnnouncementQueue {
    state: Mutex<QueueState>,
    speaker: Arc<dyn Speaker>,
    settings: SpeechSettings,
    history_capacity: usize,
    max_pending: usize,
}

impl std::fmt::Debug for AnnouncementQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnouncementQueue")
            .field("settings", &self.settings)
            .field("history_capacity", &self.history_capacity)
            .field("max_pending", &self.max_pending)
            .finish_non_exhaustive()
    }
}

impl Default for AnnouncementQueue {
    fn default() -> Self {
        Self::new(Arc::new(SilentSpeaker), &AnnouncementConfig::default())
    }
}

impl AnnouncementQueue {
    /// Create a queue delivering through the given speaker
    pub fn new(speaker: Arc<dyn Speaker>, config: &AnnouncementConfig) -> Self {
        Self {
            state: Mutex::new(QueueState::default()),
            speaker,
            settings: SpeechSettings::new(config.rate, config.volume),
            history_capacity: config.history_capacity.max(1),
            max_pending: config.max_pending.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        // A panicking speaker must not wedge the live region
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue an announcement
    ///
    /// An assertive announcement supersedes the active non-assertive item and
    /// any queued non-assertive items of lower priority, then waits at the
    /// head of the queue. Beyond `max_pending` the lowest-priority, oldest
    /// item is superseded.
    pub fn enqueue(&self, announcement: LiveAnnouncement) -> Uuid {
        let id = announcement.id;
        let mut state = self.lock();

        if announcement.interrupts() {
            let interrupt_active = state
                .active
                .as_ref()
                .is_some_and(|active| !active.interrupts());
            if interrupt_active {
                if let Some(active) = state.active.take() {
                    info!("Assertive announcement {} supersedes active {}", id, active.id);
                    self.speaker.cancel();
                    state.retire(active, AnnouncementStatus::Superseded, self.history_capacity);
                }
            }

            let (stale, keep): (Vec<Pending>, Vec<Pending>) =
                std::mem::take(&mut state.pending).into_vec().into_iter().partition(|p| {
                    !p.announcement.interrupts() && p.announcement.priority < announcement.priority
                });
            state.pending = BinaryHeap::from(keep);
            for p in stale {
                debug!("Superseding queued announcement {}", p.announcement.id);
                state.retire(p.announcement, AnnouncementStatus::Superseded, self.history_capacity);
            }
        }

        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(Pending { announcement, seq });

        while state.pending.len() > self.max_pending {
            let Some(dropped) = state.evict_one() else { break };
            warn!(
                "Announcement queue full ({}), dropping {} ({:?})",
                self.max_pending, dropped.id, dropped.priority
            );
            state.retire(dropped, AnnouncementStatus::Superseded, self.history_capacity);
        }

        debug!("Enqueued announcement {} (queue size: {})", id, state.pending.len());
        id
    }

    /// Finish the active announcement and activate the next one
    ///
    /// Call only once the previous announcement has been fully delivered.
    pub fn dequeue_next(&self) -> Option<LiveAnnouncement> {
        let mut state = self.lock();

        if let Some(done) = state.active.take() {
            state.retire(done, AnnouncementStatus::Delivered, self.history_capacity);
        }

        let next = state.pending.pop()?.announcement;
        self.speaker.speak(&next, &self.settings);
        state.active = Some(next.clone());
        debug!("Activated announcement {} ({} queued)", next.id, state.pending.len());
        Some(next)
    }

    /// Mark the active announcement delivered without activating another
    pub fn complete_active(&self) -> Option<LiveAnnouncement> {
        let mut state = self.lock();
        let done = state.active.take()?;
        state.retire(done.clone(), AnnouncementStatus::Delivered, self.history_capacity);
        Some(done)
    }

    pub fn active(&self) -> Option<LiveAnnouncement> {
        self.lock().active.clone()
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Snapshot of queued announcements in delivery order
    pub fn pending(&self) -> Vec<LiveAnnouncement> {
        let state = self.lock();
        let mut queued: Vec<&Pending> = state.pending.iter().collect();
        queued.sort_by(|a, b| b.cmp(a));
        queued.into_iter().map(|p| p.announcement.clone()).collect()
    }

    /// True when nothing is active or queued
    pub fn is_idle(&self) -> bool {
        let state = self.lock();
        state.active.is_none() && state.pending.is_empty()
    }

    /// Current state of a pending, active or retained announcement
    pub fn status(&self, id: Uuid) -> Option<AnnouncementStatus> {
        let state = self.lock();
        if state.active.as_ref().is_some_and(|a| a.id == id) {
            return Some(AnnouncementStatus::Active);
        }
        if state.pending.iter().any(|p| p.announcement.id == id) {
            return Some(AnnouncementStatus::Queued);
        }
        state
            .history
            .iter()
            .rev()
            .find(|r| r.announcement.id == id)
            .map(|r| r.status)
    }

    /// Most recent finished announcements, oldest first
    pub fn history(&self) -> Vec<AnnouncementRecord> {
        self.lock().history.iter().cloned().collect()
    }

    pub fn settings(&self) -> &SpeechSettings {
        &self.settings
    }
}
