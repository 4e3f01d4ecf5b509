// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG rule engine - matches detected violations against the criterion catalog.
//!
//! Violations are produced by an external scan step. The engine never mutates
//! them; it partitions the catalog into passed and failed criteria, groups the
//! violations by impact and derives the highest fully-passed conformance level.

use crate::catalog::{Catalog, WcagCriterion};
use crate::error::EngineError;
use crate::model::{Impact, WcagLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// How to fix a violation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSuggestion {
    pub summary: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub code_example: String,
}

/// A detected accessibility violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub id: String,
    /// Referenced criterion id, e.g. "1.4.3"
    pub criterion: String,
    pub impact: Impact,
    pub element_selector: String,
    #[serde(default)]
    pub fix: FixSuggestion,
}

impl Violation {
    pub fn new(id: &str, criterion: &str, impact: Impact, element_selector: &str) -> Self {
        Self {
            id: id.to_string(),
            criterion: criterion.to_string(),
            impact,
            element_selector: element_selector.to_string(),
            fix: FixSuggestion::default(),
        }
    }

    pub fn with_fix(mut self, summary: &str, details: &str, code_example: &str) -> Self {
        self.fix = FixSuggestion {
            summary: summary.to_string(),
            details: details.to_string(),
            code_example: code_example.to_string(),
        };
        self
    }
}

/// Violation counts by impact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactSummary {
    pub critical: usize,
    pub serious: usize,
    pub moderate: usize,
    pub minor: usize,
}

impl ImpactSummary {
    fn record(&mut self, impact: Impact) {
        match impact {
            Impact::Critical => self.critical += 1,
            Impact::Serious => self.serious += 1,
            Impact::Moderate => self.moderate += 1,
            Impact::Minor => self.minor += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.serious + self.moderate + self.minor
    }
}

/// Outcome of scoring a set of violations against a catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// 0-100
    pub score: f64,
    /// Highest fully passed level, if any
    pub level: Option<WcagLevel>,
    /// Catalog order
    pub passed_criteria: Vec<String>,
    /// Catalog order
    pub failed_criteria: Vec<String>,
    pub summary: ImpactSummary,
    /// Violations dropped for referencing criteria outside the catalog
    #[serde(default)]
    pub excluded_violations: Vec<String>,
}

/// Points deducted per violation when the scan supplies no raw score
fn impact_penalty(impact: Impact) -> f64 {
    match impact {
        Impact::Critical => 25.0,
        Impact::Serious => 15.0,
        Impact::Moderate => 8.0,
        Impact::Minor => 3.0,
    }
}

/// Stateless WCAG rule engine
#[derive(Debug, Clone, Copy, Default)]
pub struct WcagRuleEngine;

impl WcagRuleEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score violations, deriving the score from their impacts
    pub fn score(&self, violations: &[Violation], catalog: &[WcagCriterion]) -> ComplianceResult {
        self.score_with_raw(violations, catalog, None)
    }

    /// Score violations, using the scan step's raw score when supplied
    pub fn score_with_raw(
        &self,
        violations: &[Violation],
        catalog: &[WcagCriterion],
        raw_score: Option<f64>,
    ) -> ComplianceResult {
        let known: HashSet<&str> = catalog.iter().map(|c| c.id.as_str()).collect();

        let mut accepted: Vec<&Violation> = Vec::with_capacity(violations.len());
        let mut excluded_violations = Vec::new();
        for v in violations {
            if known.contains(v.criterion.as_str()) {
                accepted.push(v);
            } else {
                let err = EngineError::InvalidCriterionReference {
                    violation: v.id.clone(),
                    criterion: v.criterion.clone(),
                };
                warn!("{}; excluding it from scoring", err);
                excluded_violations.push(v.id.clone());
            }
        }

        if accepted.is_empty() {
            debug!("No applicable violations; reporting full conformance");
            return ComplianceResult {
                score: 100.0,
                level: Some(WcagLevel::AAA),
                passed_criteria: catalog.iter().map(|c| c.id.clone()).collect(),
                failed_criteria: Vec::new(),
                summary: ImpactSummary::default(),
                excluded_violations,
            };
        }

        let failing: HashSet<&str> = accepted.iter().map(|v| v.criterion.as_str()).collect();
        let (failed, passed): (Vec<&WcagCriterion>, Vec<&WcagCriterion>) =
            catalog.iter().partition(|c| failing.contains(c.id.as_str()));

        let mut summary = ImpactSummary::default();
        for v in &accepted {
            summary.record(v.impact);
        }

        let score = match raw_score {
            Some(raw) if raw.is_finite() => raw.clamp(0.0, 100.0),
            Some(raw) => {
                warn!("Ignoring non-finite raw score {}", raw);
                derived_score(&accepted)
            }
            None => derived_score(&accepted),
        };

        let level = highest_passed_level(catalog, &failing);

        debug!(
            "Scored {} violation(s): {} failed, {} passed, level {:?}",
            accepted.len(),
            failed.len(),
            passed.len(),
            level
        );

        ComplianceResult {
            score,
            level,
            passed_criteria: passed.into_iter().map(|c| c.id.clone()).collect(),
            failed_criteria: failed.into_iter().map(|c| c.id.clone()).collect(),
            summary,
            excluded_violations,
        }
    }
}

fn derived_score(violations: &[&Violation]) -> f64 {
    let penalty: f64 = violations.iter().map(|v| impact_penalty(v.impact)).sum();
    (100.0 - penalty).clamp(0.0, 100.0)
}

/// Highest level whose criteria, together with all lower levels, are all passed
fn highest_passed_level(catalog: &[WcagCriterion], failing: &HashSet<&str>) -> Option<WcagLevel> {
    let mut best = None;
    for level in WcagLevel::ALL {
        let all_pass = catalog
            .iter()
            .filter(|c| c.level <= level)
            .all(|c| !failing.contains(c.id.as_str()));
        if !all_pass {
            break;
        }
        best = Some(level);
    }
    best
}

/// Score violations against a catalog with the default engine
pub fn score_compliance(violations: &[Violation], catalog: &Catalog) -> ComplianceResult {
    WcagRuleEngine.score(violations, &catalog.criteria)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Principle;

    fn criterion(id: &str, level: WcagLevel) -> WcagCriterion {
        WcagCriterion::new(id, level, Principle::Perceivable, id).unwrap()
    }

    fn catalog_of_24() -> Vec<WcagCriterion> {
        Catalog::wcag21()
            .criteria
            .iter()
            .filter(|c| c.level == WcagLevel::AA)
            .cloned()
            .collect()
    }

    #[test]
    fn test_empty_violations_full_conformance() {
        let result = score_compliance(&[], Catalog::wcag21());
        assert_eq!(result.level, Some(WcagLevel::AAA));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.passed_criteria.len(), Catalog::wcag21().len());
        assert!(result.failed_criteria.is_empty());
    }

    #[test]
    fn test_empty_violations_ignores_raw_score() {
        let result = WcagRuleEngine.score_with_raw(&[], &catalog_of_24(), Some(40.0));
        assert_eq!(result.score, 100.0);
    }

    #[test]
    fn test_partition_24_criteria() {
        let catalog = catalog_of_24();
        assert_eq!(catalog.len(), 24);
        let violations = vec![
            Violation::new("v1", "1.4.3", Impact::Serious, ".btn-secondary"),
            Violation::new("v2", "2.4.7", Impact::Moderate, "input[type=\"text\"]"),
        ];
        let result = WcagRuleEngine.score(&violations, &catalog);
        assert_eq!(result.passed_criteria.len(), 22);
        assert_eq!(result.failed_criteria, vec!["1.4.3", "2.4.7"]);
        assert_eq!(result.summary.serious, 1);
        assert_eq!(result.summary.moderate, 1);

        let passed: HashSet<_> = result.passed_criteria.iter().collect();
        assert!(result.failed_criteria.iter().all(|f| !passed.contains(f)));
    }

    #[test]
    fn test_multiple_violations_same_criterion() {
        let violations = vec![
            Violation::new("v1", "1.1.1", Impact::Critical, "img.hero"),
            Violation::new("v2", "1.1.1", Impact::Critical, "img.logo"),
        ];
        let result = score_compliance(&violations, Catalog::wcag21());
        assert_eq!(result.failed_criteria, vec!["1.1.1"]);
        assert_eq!(result.summary.critical, 2);
        assert_eq!(result.score, 50.0);
        assert_eq!(result.level, None);
    }

    #[test]
    fn test_level_derivation() {
        let catalog = vec![
            criterion("1.1.1", WcagLevel::A),
            criterion("1.4.3", WcagLevel::AA),
            criterion("1.4.6", WcagLevel::AAA),
        ];

        let aaa_fail = [Violation::new("v", "1.4.6", Impact::Minor, "p")];
        assert_eq!(WcagRuleEngine.score(&aaa_fail, &catalog).level, Some(WcagLevel::AA));

        let aa_fail = [Violation::new("v", "1.4.3", Impact::Minor, "p")];
        assert_eq!(WcagRuleEngine.score(&aa_fail, &catalog).level, Some(WcagLevel::A));

        let a_fail = [Violation::new("v", "1.1.1", Impact::Minor, "p")];
        assert_eq!(WcagRuleEngine.score(&a_fail, &catalog).level, None);
    }

    #[test]
    fn test_unknown_criterion_excluded() {
        let violations = vec![
            Violation::new("bogus", "9.9.9", Impact::Critical, "div"),
            Violation::new("real", "2.4.7", Impact::Minor, "a"),
        ];
        let result = score_compliance(&violations, Catalog::wcag21());
        assert_eq!(result.excluded_violations, vec!["bogus"]);
        assert_eq!(result.failed_criteria, vec!["2.4.7"]);
        assert_eq!(result.summary.total(), 1);
        assert_eq!(result.score, 97.0);
    }

    #[test]
    fn test_only_unknown_criteria_is_full_conformance() {
        let violations = vec![Violation::new("bogus", "9.9.9", Impact::Critical, "div")];
        let result = score_compliance(&violations, Catalog::wcag21());
        assert_eq!(result.level, Some(WcagLevel::AAA));
        assert_eq!(result.score, 100.0);
        assert_eq!(result.excluded_violations.len(), 1);
    }

    #[test]
    fn test_raw_score_clamped() {
        let violations = vec![Violation::new("v", "2.4.7", Impact::Minor, "a")];
        let catalog = catalog_of_24();
        assert_eq!(WcagRuleEngine.score_with_raw(&violations, &catalog, Some(85.0)).score, 85.0);
        assert_eq!(WcagRuleEngine.score_with_raw(&violations, &catalog, Some(140.0)).score, 100.0);
        assert_eq!(WcagRuleEngine.score_with_raw(&violations, &catalog, Some(-3.0)).score, 0.0);
        assert_eq!(
            WcagRuleEngine.score_with_raw(&violations, &catalog, Some(f64::NAN)).score,
            97.0
        );
    }

    #[test]
    fn test_idempotent() {
        let violations = vec![
            Violation::new("v1", "1.4.3", Impact::Serious, ".a"),
            Violation::new("v2", "3.3.2", Impact::Critical, ".b"),
        ];
        let first = score_compliance(&violations, Catalog::wcag21());
        let second = score_compliance(&violations, Catalog::wcag21());
        assert_eq!(first, second);
    }

    #[test]
    fn test_derived_score_floors_at_zero() {
        let violations: Vec<_> = (0..6)
            .map(|i| Violation::new(&format!("v{}", i), "4.1.2", Impact::Critical, "div"))
            .collect();
        assert_eq!(score_compliance(&violations, Catalog::wcag21()).score, 0.0);
    }
}
