// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for scan results.
//!
//! Supports multiple output formats:
//! - Text: human-readable summary with WCAG criterion references
//! - JSON: the full scan report for programmatic consumption
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::analyzers::keyboard::TabOrderIssueKind;
use crate::model::{Impact, Severity};
use crate::scanner::ScanReport;
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Generate a report from a scan
pub fn generate_report(report: &ScanReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(report),
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Sarif => generate_sarif_report(report),
    }
}

/// Generate human-readable text report
fn generate_text_report(report: &ScanReport) -> String {
    let mut output = String::new();
    let agg = &report.aggregate;

    output.push_str("=== WCAG Compliance Report ===\n\n");
    output.push_str(&format!("Catalog: {}\n", report.catalog_version));
    output.push_str(&format!(
        "Overall score: {}/100 (WCAG {:.0}, contrast {:.0})\n",
        agg.overall_score, agg.wcag_score, agg.contrast_score
    ));
    match agg.level {
        Some(level) => output.push_str(&format!("Conformance level: {}\n\n", level)),
        None => output.push_str("Conformance level: none\n\n"),
    }

    if !report.contrast.is_empty() || !report.contrast_errors.is_empty() {
        output.push_str(&format!("--- Contrast ({}) ---\n", report.contrast.len()));
        for check in &report.contrast {
            output.push_str(&format!(
                "{} on {}: {:.2}:1 AA={} AAA={}\n  {}\n",
                check.foreground,
                check.background,
                check.ratio,
                pass(check.wcag_aa),
                pass(check.wcag_aaa),
                check.recommendation.message()
            ));
        }
        for err in &report.contrast_errors {
            output.push_str(&format!(
                "{} on {}: not evaluated ({})\n",
                err.pair.foreground, err.pair.background, err.error
            ));
        }
        output.push('\n');
    }

    let compliance = &report.compliance;
    output.push_str(&format!(
        "--- WCAG criteria: {} passed, {} failed ---\n",
        compliance.passed_criteria.len(),
        compliance.failed_criteria.len()
    ));
    for impact in [Impact::Critical, Impact::Serious, Impact::Moderate, Impact::Minor] {
        for v in report.violations.iter().filter(|v| v.impact == impact) {
            if compliance.excluded_violations.contains(&v.id) {
                continue;
            }
            output.push_str(&format!(
                "[WCAG-{}] {} ({}) at {}\n",
                v.criterion, v.id, v.impact, v.element_selector
            ));
            if !v.fix.summary.is_empty() {
                output.push_str(&format!("  Fix: {}\n", v.fix.summary));
            }
        }
    }
    if !compliance.excluded_violations.is_empty() {
        output.push_str(&format!(
            "Excluded (unknown criterion): {}\n",
            compliance.excluded_violations.join(", ")
        ));
    }
    output.push('\n');

    let tab = &report.tab_order;
    output.push_str(&format!(
        "--- Tab order: score {}, {} issue(s) ---\n",
        tab.score,
        tab.issues.len()
    ));
    if !tab.sequence.is_empty() {
        let ids: Vec<&str> = tab.sequence.iter().map(|e| e.id.as_str()).collect();
        output.push_str(&format!("Sequence: {}\n", ids.join(" -> ")));
    }
    for issue in &tab.issues {
        output.push_str(&format!(
            "[{}] {}: {}\n  Fix: {}\n",
            issue.severity, issue.element_id, issue.description, issue.fix
        ));
    }
    for rec in &tab.recommendations {
        output.push_str(&format!("  * {}\n", rec));
    }
    output.push('\n');

    if !report.shortcut_conflicts.is_empty() {
        output.push_str(&format!(
            "--- Shortcut conflicts ({}) ---\n",
            report.shortcut_conflicts.len()
        ));
        for s in &report.shortcut_conflicts {
            output.push_str(&format!(
                "{} ({}) conflicts with {}\n",
                s.id,
                chord_label(&s.key, &s.modifiers),
                s.conflicts.join(", ")
            ));
        }
        output.push('\n');
    }

    if agg.level.is_none() {
        output.push_str("RESULT: NON-CONFORMANT\n");
    } else if compliance.failed_criteria.is_empty() && tab.issues.is_empty() {
        output.push_str("RESULT: PASS\n");
    } else {
        output.push_str("RESULT: PASS WITH ISSUES\n");
    }

    output
}

fn pass(flag: bool) -> &'static str {
    if flag {
        "pass"
    } else {
        "fail"
    }
}

fn chord_label(key: &str, modifiers: &[String]) -> String {
    let mut parts: Vec<&str> = modifiers.iter().map(String::as_str).collect();
    parts.push(key);
    parts.join("+")
}

/// Generate JSON report
fn generate_json_report(report: &ScanReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize report: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

/// Scan results point at elements, not files
#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "logicalLocations")]
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Debug, Serialize)]
struct SarifLogicalLocation {
    name: String,
    kind: String,
}

impl SarifResult {
    fn new(rule_id: String, level: &str, text: String, element: Option<&str>) -> Self {
        let locations = element
            .filter(|e| !e.is_empty())
            .map(|e| {
                vec![SarifLocation {
                    logical_locations: vec![SarifLogicalLocation {
                        name: e.to_string(),
                        kind: "element".to_string(),
                    }],
                }]
            })
            .unwrap_or_default();
        Self {
            rule_id,
            level: level.to_string(),
            message: SarifMessage { text },
            locations,
        }
    }
}

fn impact_level(impact: Impact) -> &'static str {
    match impact {
        Impact::Critical | Impact::Serious => "error",
        Impact::Moderate => "warning",
        Impact::Minor => "note",
    }
}

fn severity_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Suggestion => "note",
    }
}

/// Criterion a tab order issue violates
fn tab_issue_criterion(kind: TabOrderIssueKind) -> &'static str {
    match kind {
        TabOrderIssueKind::TrappedFocus => "2.1.2",
        TabOrderIssueKind::IllogicalOrder => "2.4.3",
        TabOrderIssueKind::InvisibleElement => "2.4.7",
        TabOrderIssueKind::MissingFocus | TabOrderIssueKind::NegativeTabIndex => "2.1.1",
    }
}

/// Generate SARIF report
fn generate_sarif_report(report: &ScanReport) -> String {
    let excluded = &report.compliance.excluded_violations;
    let mut results: Vec<SarifResult> = report
        .violations
        .iter()
        .filter(|v| !excluded.contains(&v.id))
        .map(|v| {
            let text = if v.fix.summary.is_empty() {
                format!("{} ({} impact)", v.id, v.impact)
            } else {
                format!("{} ({} impact): {}", v.id, v.impact, v.fix.summary)
            };
            SarifResult::new(
                format!("WCAG-{}", v.criterion),
                impact_level(v.impact),
                text,
                Some(&v.element_selector),
            )
        })
        .collect();

    results.extend(report.failing_contrast().map(|c| {
        SarifResult::new(
            "WCAG-1.4.3".to_string(),
            "error",
            format!(
                "Contrast {:.2}:1 for {} on {}. {}",
                c.ratio,
                c.foreground,
                c.background,
                c.recommendation.message()
            ),
            None,
        )
    }));

    results.extend(report.tab_order.issues.iter().map(|i| {
        SarifResult::new(
            format!("WCAG-{}", tab_issue_criterion(i.kind)),
            severity_level(i.severity),
            i.description.clone(),
            Some(&i.element_id),
        )
    }));

    results.extend(report.shortcut_conflicts.iter().map(|s| {
        SarifResult::new(
            "WCAG-2.1.4".to_string(),
            "warning",
            format!(
                "Shortcut {} ({}) conflicts with {}",
                s.id,
                chord_label(&s.key, &s.modifiers),
                s.conflicts.join(", ")
            ),
            None,
        )
    }));

    let sarif = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "wcag-engine".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&sarif).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}
