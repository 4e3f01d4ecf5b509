// SPDX-License-Identifier: PMPL-1.0-or-later
//! Headless scan orchestration.
//!
//! Reads a scan description produced by a page crawler and runs every
//! evaluator over it, producing a single report.

use crate::aggregate::{aggregate, AggregateScore};
use crate::analyzers::keyboard::{detect_conflicts, KeyboardShortcut};
use crate::analyzers::{
    ComplianceResult, ContrastCheck, ContrastEvaluator, FocusableElement, TabOrderAnalyzer,
    TabOrderReport, Violation, WcagRuleEngine,
};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// A foreground/background pair as written in the scan file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub foreground: String,
    pub background: String,
    /// Where the pair was found, e.g. a CSS selector
    #[serde(default)]
    pub selector: Option<String>,
}

/// Everything a scan needs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanInput {
    #[serde(default)]
    pub contrast_pairs: Vec<ColorPair>,
    #[serde(default)]
    pub violations: Vec<Violation>,
    /// Score computed by the upstream scan step, if any
    #[serde(default)]
    pub raw_score: Option<f64>,
    #[serde(default)]
    pub elements: Vec<FocusableElement>,
    #[serde(default)]
    pub shortcuts: Vec<KeyboardShortcut>,
    /// Replaces the built-in WCAG 2.1 catalog
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

/// A pair that could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContrastError {
    pub pair: ColorPair,
    pub error: String,
}

/// Result of a full scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub catalog_version: String,
    pub contrast: Vec<ContrastCheck>,
    pub contrast_errors: Vec<ContrastError>,
    pub violations: Vec<Violation>,
    pub compliance: ComplianceResult,
    pub tab_order: TabOrderReport,
    /// Shortcuts bound to a chord that another enabled shortcut also uses
    pub shortcut_conflicts: Vec<KeyboardShortcut>,
    pub aggregate: AggregateScore,
}

impl ScanReport {
    /// Contrast checks failing AA
    pub fn failing_contrast(&self) -> impl Iterator<Item = &ContrastCheck> {
        self.contrast.iter().filter(|c| !c.wcag_aa)
    }
}

/// Read a scan description from a JSON file
pub fn load_scan_input(path: &Path) -> Result<ScanInput> {
    let content = std::fs::read_to_string(path)?;
    let input: ScanInput = serde_json::from_str(&content)?;
    if let Some(catalog) = &input.catalog {
        catalog.validate()?;
    }
    Ok(input)
}

/// Run every evaluator over `input`
pub fn run_scan(input: &ScanInput, config: &Config) -> ScanReport {
    let catalog = input.catalog.as_ref().unwrap_or(Catalog::wcag21());
    info!(
        "Scanning: {} color pair(s), {} violation(s), {} element(s) against {}",
        input.contrast_pairs.len(),
        input.violations.len(),
        input.elements.len(),
        catalog.version
    );

    info!("Evaluating color contrast");
    let evaluator = ContrastEvaluator::new(config.contrast);
    let mut contrast = Vec::with_capacity(input.contrast_pairs.len());
    let mut contrast_errors = Vec::new();
    for pair in &input.contrast_pairs {
        match evaluator.evaluate_str(&pair.foreground, &pair.background) {
            Ok(check) => contrast.push(check),
            Err(e) => {
                warn!("Skipping color pair: {}", e);
                contrast_errors.push(ContrastError {
                    pair: pair.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    info!("Scoring WCAG violations");
    let compliance =
        WcagRuleEngine::new().score_with_raw(&input.violations, &catalog.criteria, input.raw_score);

    info!("Analyzing tab order");
    let tab_order = TabOrderAnalyzer::new(config.tab_order).analyze(&input.elements);

    let shortcut_conflicts: Vec<KeyboardShortcut> = detect_conflicts(&input.shortcuts)
        .into_iter()
        .filter(|s| !s.conflicts.is_empty())
        .collect();
    if !shortcut_conflicts.is_empty() {
        warn!("{} keyboard shortcut(s) conflict", shortcut_conflicts.len());
    }

    let aggregate = aggregate(&contrast, &compliance);
    info!(
        "Scan complete: overall {} level {}",
        aggregate.overall_score,
        aggregate
            .level
            .map_or_else(|| "none".to_string(), |l| l.to_string())
    );

    ScanReport {
        catalog_version: catalog.version.clone(),
        contrast,
        contrast_errors,
        violations: input.violations.clone(),
        compliance,
        tab_order,
        shortcut_conflicts,
        aggregate,
    }
}
