// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for wcag-engine
//!
//! Thresholds, penalties and queue settings live here so that the evaluators
//! stay pure functions of their inputs plus an immutable config.

use crate::error::{EngineError, Result};
use crate::model::WcagLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Contrast classification thresholds
    #[serde(default)]
    pub contrast: ContrastThresholds,

    /// Tab order scoring
    #[serde(default)]
    pub tab_order: TabOrderConfig,

    /// Live announcement queue
    #[serde(default)]
    pub announcements: AnnouncementConfig,

    /// Overall compliance gate
    #[serde(default)]
    pub compliance: ComplianceConfig,
}

/// Contrast ratio thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastThresholds {
    /// Minimum ratio for WCAG AA (normal text)
    #[serde(default = "default_aa")]
    pub aa: f64,

    /// Minimum ratio for WCAG AAA (normal text)
    #[serde(default = "default_aaa")]
    pub aaa: f64,

    /// Ratio that maps to a score of 100
    #[serde(default = "default_aaa")]
    pub score_target: f64,
}

impl Default for ContrastThresholds {
    fn default() -> Self {
        Self {
            aa: default_aa(),
            aaa: default_aaa(),
            score_target: default_aaa(),
        }
    }
}

fn default_aa() -> f64 {
    4.5
}

fn default_aaa() -> f64 {
    7.0
}

/// How tab order issues are turned into a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabScoring {
    /// Flat penalty per issue
    #[default]
    Linear,
    /// Penalty weighted by issue severity
    Weighted,
}

/// Tab order analyzer configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TabOrderConfig {
    /// Points deducted per issue in linear scoring
    #[serde(default = "default_penalty")]
    pub penalty_per_issue: u32,

    /// Scoring strategy
    #[serde(default)]
    pub scoring: TabScoring,
}

impl Default for TabOrderConfig {
    fn default() -> Self {
        Self {
            penalty_per_issue: default_penalty(),
            scoring: TabScoring::Linear,
        }
    }
}

fn default_penalty() -> u32 {
    10
}

/// Announcement queue configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementConfig {
    /// Number of finished announcements kept for audit
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Speech rate passed to the speaker
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// Speech volume passed to the speaker
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Queued announcements kept before the lowest-priority one is dropped
    #[serde(default = "default_max_pending")]
    pub max_pending: usize,
}

impl Default for AnnouncementConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            rate: default_rate(),
            volume: default_volume(),
            max_pending: default_max_pending(),
        }
    }
}

fn default_history_capacity() -> usize {
    10
}

fn default_rate() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    0.7
}

fn default_max_pending() -> usize {
    25
}

/// Compliance gate used by the CLI exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Minimum aggregate level for a scan to pass
    #[serde(default = "default_required_level")]
    pub required_level: WcagLevel,
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            required_level: default_required_level(),
        }
    }
}

fn default_required_level() -> WcagLevel {
    WcagLevel::AA
}

impl Config {
    /// Check that the thresholds are internally consistent
    pub fn validate(&self) -> Result<()> {
        let c = &self.contrast;
        if !(c.aa >= 1.0 && c.aaa >= 1.0 && c.score_target >= 1.0) {
            return Err(EngineError::Config(
                "contrast thresholds must be at least 1.0".to_string(),
            ));
        }
        if c.aaa < c.aa {
            return Err(EngineError::Config(format!(
                "contrast.aaa ({}) must not be lower than contrast.aa ({})",
                c.aaa, c.aa
            )));
        }
        if self.announcements.history_capacity == 0 {
            return Err(EngineError::Config(
                "announcements.history_capacity must be positive".to_string(),
            ));
        }
        if self.announcements.max_pending == 0 {
            return Err(EngineError::Config(
                "announcements.max_pending must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from a TOML file, falling back to defaults when absent
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}
