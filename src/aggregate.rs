// SPDX-License-Identifier: PMPL-1.0-or-later
//! Composite compliance score for dashboards.
//!
//! Blends the rule engine score with the mean contrast score. A single pair
//! below AA contrast disqualifies any advertised conformance level, whatever
//! the other criteria say.

use crate::analyzers::{ComplianceResult, ContrastCheck};
use crate::model::WcagLevel;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Combined score and level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateScore {
    /// Rounded 0-100
    pub overall_score: u32,
    pub level: Option<WcagLevel>,
    /// Mean contrast score before blending
    pub contrast_score: f64,
    /// Rule engine score before blending
    pub wcag_score: f64,
    /// Number of contrast pairs failing AA
    pub below_aa: usize,
}

/// Combine contrast checks with a rule engine result
pub fn aggregate(checks: &[ContrastCheck], wcag: &ComplianceResult) -> AggregateScore {
    let contrast_score = if checks.is_empty() {
        debug!("No contrast checks supplied; contrast counts as fully passing");
        100.0
    } else {
        checks.iter().map(|c| c.score).sum::<f64>() / checks.len() as f64
    };

    let wcag_score = wcag.score.clamp(0.0, 100.0);
    let overall = ((wcag_score + contrast_score) / 2.0).round().clamp(0.0, 100.0);

    let below_aa = checks.iter().filter(|c| !c.wcag_aa).count();
    let level = if below_aa > 0 { None } else { wcag.level };

    AggregateScore {
        // clamped to [0, 100] above
        overall_score: overall as u32,
        level,
        contrast_score,
        wcag_score,
        below_aa,
    }
}

impl AggregateScore {
    /// Whether the advertised level reaches `required`
    pub fn meets(&self, required: WcagLevel) -> bool {
        self.level.is_some_and(|level| level >= required)
    }
}
