// SPDX-License-Identifier: PMPL-1.0-or-later
//! Keyboard navigation analyzer - WCAG 2.1.1 Keyboard, 2.1.2 No Keyboard Trap, 2.4.3 Focus Order
//!
//! Orders focusable elements the way browsers do:
//! - positive tabindex first, ascending, ties by document order
//! - then tabindex 0 in document order
//! - negative tabindex and invisible elements are never reachable by Tab
//!
//! Also detects conflicting keyboard shortcuts.

use crate::config::{TabOrderConfig, TabScoring};
use crate::model::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// An interactive element extracted by the page scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusableElement {
    pub id: String,
    pub tab_index: i32,
    /// Position in document order
    pub dom_order: u32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub accessible: bool,
    /// Problems reported by the accessibility scan
    #[serde(default)]
    pub issues: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl FocusableElement {
    pub fn new(id: &str, tab_index: i32, dom_order: u32) -> Self {
        Self {
            id: id.to_string(),
            tab_index,
            dom_order,
            visible: true,
            accessible: true,
            issues: Vec::new(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn inaccessible(mut self) -> Self {
        self.accessible = false;
        self
    }

    pub fn with_issue(mut self, issue: &str) -> Self {
        self.issues.push(issue.to_string());
        self
    }

    /// Whether the Tab key can ever land on this element
    pub fn in_tab_sequence(&self) -> bool {
        self.visible && self.tab_index >= 0
    }
}

/// Kinds of tab order problems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabOrderIssueKind {
    MissingFocus,
    IllogicalOrder,
    TrappedFocus,
    InvisibleElement,
    NegativeTabIndex,
}

impl TabOrderIssueKind {
    /// Classify free-form scan text
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("trap") {
            TabOrderIssueKind::TrappedFocus
        } else if lower.contains("order") || lower.contains("sequence") {
            TabOrderIssueKind::IllogicalOrder
        } else if lower.contains("invisible") || lower.contains("hidden") {
            TabOrderIssueKind::InvisibleElement
        } else if lower.contains("tabindex") || lower.contains("negative") {
            TabOrderIssueKind::NegativeTabIndex
        } else {
            TabOrderIssueKind::MissingFocus
        }
    }

    fn fix(&self) -> &'static str {
        match self {
            TabOrderIssueKind::MissingFocus => "Add proper keyboard support and ARIA attributes",
            TabOrderIssueKind::IllogicalOrder => "Reorder the DOM so tab order follows the visual layout",
            TabOrderIssueKind::TrappedFocus => "Let Escape or Tab move focus out of the container",
            TabOrderIssueKind::InvisibleElement => "Hide the element from focus or make it visible when focused",
            TabOrderIssueKind::NegativeTabIndex => "Use tabindex=\"0\" for elements users must reach by keyboard",
        }
    }
}

/// A detected tab order problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabOrderIssue {
    pub element_id: String,
    pub kind: TabOrderIssueKind,
    pub severity: Severity,
    pub description: String,
    pub fix: String,
}

impl TabOrderIssue {
    fn new(element_id: &str, kind: TabOrderIssueKind, severity: Severity, description: String) -> Self {
        Self {
            element_id: element_id.to_string(),
            kind,
            severity,
            description,
            fix: kind.fix().to_string(),
        }
    }
}

/// Outcome of a tab order analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabOrderReport {
    pub sequence: Vec<FocusableElement>,
    pub issues: Vec<TabOrderIssue>,
    /// 0-100
    pub score: u32,
    pub recommendations: Vec<String>,
}

const BASELINE_RECOMMENDATIONS: [&str; 3] = [
    "Ensure logical tab order follows visual layout",
    "Add skip links for better navigation",
    "Implement focus indicators for all interactive elements",
];

/// Tab order analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct TabOrderAnalyzer {
    config: TabOrderConfig,
}

impl TabOrderAnalyzer {
    pub fn new(config: TabOrderConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, elements: &[FocusableElement]) -> TabOrderReport {
        if elements.is_empty() {
            debug!("No focusable elements supplied");
        }

        let sequence = tab_sequence(elements);
        let issues = detect_issues(elements);
        let score = self.score(&issues);
        let recommendations = recommendations(elements, &issues);

        debug!(
            "Tab order: {} of {} element(s) reachable, {} issue(s), score {}",
            sequence.len(),
            elements.len(),
            issues.len(),
            score
        );

        TabOrderReport {
            sequence,
            issues,
            score,
            recommendations,
        }
    }

    fn score(&self, issues: &[TabOrderIssue]) -> u32 {
        let penalty: u32 = match self.config.scoring {
            TabScoring::Linear => {
                let count = u32::try_from(issues.len()).unwrap_or(u32::MAX);
                count.saturating_mul(self.config.penalty_per_issue)
            }
            TabScoring::Weighted => issues
                .iter()
                .map(|i| match i.severity {
                    Severity::Error => 15,
                    Severity::Warning => 10,
                    Severity::Suggestion => 5,
                })
                .fold(0u32, u32::saturating_add),
        };
        100u32.saturating_sub(penalty)
    }
}

/// Browser tab sequence for the given elements
pub fn tab_sequence(elements: &[FocusableElement]) -> Vec<FocusableElement> {
    let mut sequence: Vec<FocusableElement> = elements
        .iter()
        .filter(|e| e.in_tab_sequence())
        .cloned()
        .collect();

    // tabindex 0 sorts after every positive index
    sequence.sort_by_key(|e| {
        let group = if e.tab_index > 0 { 0 } else { 1 };
        (group, e.tab_index, e.dom_order)
    });
    sequence
}

fn detect_issues(elements: &[FocusableElement]) -> Vec<TabOrderIssue> {
    let mut issues = Vec::new();

    for el in elements {
        let reported = el.issues.first().map(|first| {
            let kind = TabOrderIssueKind::classify(first);
            issues.push(TabOrderIssue::new(&el.id, kind, Severity::Warning, first.clone()));
            kind
        });

        let structural = if el.tab_index < 0 && el.accessible {
            Some((
                TabOrderIssueKind::NegativeTabIndex,
                format!(
                    "Interactive element has tabindex=\"{}\" and cannot be reached with Tab",
                    el.tab_index
                ),
            ))
        } else if !el.visible && el.tab_index >= 0 && el.accessible {
            Some((
                TabOrderIssueKind::InvisibleElement,
                "Focusable element is not visible".to_string(),
            ))
        } else {
            None
        };

        // one issue per kind per element
        if let Some((kind, description)) = structural {
            if reported != Some(kind) {
                issues.push(TabOrderIssue::new(&el.id, kind, Severity::Warning, description));
            }
        }
    }

    issues
}

fn recommendations(elements: &[FocusableElement], issues: &[TabOrderIssue]) -> Vec<String> {
    let mut recs: Vec<String> = BASELINE_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect();

    if elements.iter().any(|e| e.tab_index > 0 && e.visible) {
        recs.push(
            "Avoid positive tabindex values; use tabindex=\"0\" and DOM order instead".to_string(),
        );
    }
    let has = |kind: TabOrderIssueKind| issues.iter().any(|i| i.kind == kind);
    if has(TabOrderIssueKind::NegativeTabIndex) {
        recs.push("Make every interactive control reachable by keyboard".to_string());
    }
    if has(TabOrderIssueKind::TrappedFocus) {
        recs.push("Provide an Escape route from every focus trap".to_string());
    }
    if has(TabOrderIssueKind::InvisibleElement) {
        recs.push("Remove hidden elements from the tab sequence".to_string());
    }

    recs
}

/// Analyze with default scoring
pub fn analyze_tab_order(elements: &[FocusableElement]) -> TabOrderReport {
    TabOrderAnalyzer::default().analyze(elements)
}

/// Where a shortcut is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortcutContext {
    Global,
    Local,
    Modal,
}

/// A registered keyboard shortcut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardShortcut {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub context: ShortcutContext,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ids of enabled shortcuts bound to the same chord
    #[serde(default)]
    pub conflicts: Vec<String>,
}

impl KeyboardShortcut {
    pub fn new(id: &str, key: &str, modifiers: &[&str], context: ShortcutContext) -> Self {
        Self {
            id: id.to_string(),
            key: key.to_string(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            description: String::new(),
            context,
            enabled: true,
            conflicts: Vec::new(),
        }
    }

    fn chord(&self) -> (String, BTreeSet<String>) {
        chord(&self.key, &self.modifiers)
    }
}

fn chord<S: AsRef<str>>(key: &str, modifiers: &[S]) -> (String, BTreeSet<String>) {
    (
        key.to_lowercase(),
        modifiers.iter().map(|m| m.as_ref().to_lowercase()).collect(),
    )
}

fn contexts_overlap(a: ShortcutContext, b: ShortcutContext) -> bool {
    a == b || a == ShortcutContext::Global || b == ShortcutContext::Global
}

/// Fill in `conflicts` for every shortcut
pub fn detect_conflicts(shortcuts: &[KeyboardShortcut]) -> Vec<KeyboardShortcut> {
    let chords: Vec<_> = shortcuts.iter().map(|s| s.chord()).collect();

    shortcuts
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut out = s.clone();
            out.conflicts = if s.enabled {
                shortcuts
                    .iter()
                    .enumerate()
                    .filter(|(j, other)| {
                        *j != i
                            && other.enabled
                            && chords[*j] == chords[i]
                            && contexts_overlap(s.context, other.context)
                    })
                    .map(|(_, other)| other.id.clone())
                    .collect()
            } else {
                Vec::new()
            };
            out
        })
        .collect()
}

/// First enabled shortcut matching the pressed chord
pub fn find_shortcut<'a>(
    shortcuts: &'a [KeyboardShortcut],
    key: &str,
    modifiers: &[&str],
) -> Option<&'a KeyboardShortcut> {
    let pressed = chord(key, modifiers);
    shortcuts.iter().find(|s| s.enabled && s.chord() == pressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(report: &TabOrderReport) -> Vec<&str> {
        report.sequence.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_positive_tabindex_first() {
        let elements = vec![
            FocusableElement::new("a", 0, 5),
            FocusableElement::new("b", 2, 1),
            FocusableElement::new("c", 0, 2),
        ];
        let report = analyze_tab_order(&elements);
        assert_eq!(ids(&report), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_positive_ties_broken_by_dom_order() {
        let elements = vec![
            FocusableElement::new("late", 1, 9),
            FocusableElement::new("three", 3, 0),
            FocusableElement::new("early", 1, 4),
            FocusableElement::new("zero", 0, 1),
        ];
        let report = analyze_tab_order(&elements);
        assert_eq!(ids(&report), vec!["early", "late", "three", "zero"]);
    }

    #[test]
    fn test_excludes_negative_and_invisible() {
        let elements = vec![
            FocusableElement::new("neg", -1, 0),
            FocusableElement::new("hidden", 0, 1).hidden(),
            FocusableElement::new("ok", 0, 2),
        ];
        let report = analyze_tab_order(&elements);
        assert_eq!(ids(&report), vec!["ok"]);

        let kinds: Vec<_> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![TabOrderIssueKind::NegativeTabIndex, TabOrderIssueKind::InvisibleElement]
        );
        assert_eq!(report.score, 80);
    }

    #[test]
    fn test_scan_text_and_structure_report_one_issue_per_kind() {
        let elements = vec![
            FocusableElement::new("close", -1, 0).with_issue("Negative tabindex on close button"),
            FocusableElement::new("tip", 0, 1).hidden().with_issue("Hidden tooltip receives focus"),
            FocusableElement::new("menu", -1, 2).with_issue("Focus trap in menu"),
        ];
        let report = analyze_tab_order(&elements);

        let kinds: Vec<_> = report.issues.iter().map(|i| (i.element_id.as_str(), i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("close", TabOrderIssueKind::NegativeTabIndex),
                ("tip", TabOrderIssueKind::InvisibleElement),
                ("menu", TabOrderIssueKind::TrappedFocus),
                ("menu", TabOrderIssueKind::NegativeTabIndex),
            ]
        );
        assert_eq!(report.issues[0].description, "Negative tabindex on close button");
        assert_eq!(report.score, 60);
    }

    #[test]
    fn test_negative_tabindex_on_non_interactive_is_fine() {
        let elements = vec![FocusableElement::new("decor", -1, 0).inaccessible()];
        let report = analyze_tab_order(&elements);
        assert!(report.issues.is_empty());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_scan_issues_become_warnings() {
        let elements = vec![
            FocusableElement::new("elem-1", 0, 0),
            FocusableElement::new("elem-2", 0, 1).with_issue("Missing label association"),
            FocusableElement::new("elem-3", 0, 2)
                .inaccessible()
                .with_issue("Custom element needs keyboard handling")
                .with_issue("Missing aria-expanded"),
        ];
        let report = analyze_tab_order(&elements);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(report.issues[1].description, "Custom element needs keyboard handling");
        assert_eq!(report.score, 80);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_issue_classification() {
        assert_eq!(TabOrderIssueKind::classify("Focus trap in modal"), TabOrderIssueKind::TrappedFocus);
        assert_eq!(TabOrderIssueKind::classify("Illogical order"), TabOrderIssueKind::IllogicalOrder);
        assert_eq!(TabOrderIssueKind::classify("Hidden but focusable"), TabOrderIssueKind::InvisibleElement);
        assert_eq!(TabOrderIssueKind::classify("tabindex=-1 on link"), TabOrderIssueKind::NegativeTabIndex);
        assert_eq!(TabOrderIssueKind::classify("No focus style"), TabOrderIssueKind::MissingFocus);
    }

    #[test]
    fn test_score_floors_at_zero() {
        let elements: Vec<_> = (0..12)
            .map(|i| FocusableElement::new(&format!("e{}", i), 0, i).with_issue("broken"))
            .collect();
        assert_eq!(analyze_tab_order(&elements).score, 0);
    }

    #[test]
    fn test_weighted_scoring() {
        let analyzer = TabOrderAnalyzer::new(TabOrderConfig {
            penalty_per_issue: 10,
            scoring: TabScoring::Weighted,
        });
        let elements = vec![FocusableElement::new("a", 0, 0).with_issue("Focus trap")];
        assert_eq!(analyzer.analyze(&elements).score, 90);
    }

    #[test]
    fn test_targeted_recommendations() {
        let elements = vec![
            FocusableElement::new("a", 3, 0),
            FocusableElement::new("b", 0, 1).with_issue("Focus trap in dialog"),
        ];
        let recs = analyze_tab_order(&elements).recommendations;
        assert!(recs.iter().any(|r| r.contains("positive tabindex")));
        assert!(recs.iter().any(|r| r.contains("Escape")));
    }

    #[test]
    fn test_empty_input() {
        let report = analyze_tab_order(&[]);
        assert!(report.sequence.is_empty());
        assert_eq!(report.score, 100);
    }

    #[test]
    fn test_shortcut_conflicts() {
        let shortcuts = vec![
            KeyboardShortcut::new("skip-main", "1", &["alt"], ShortcutContext::Global),
            KeyboardShortcut::new("search-focus", "s", &["ctrl"], ShortcutContext::Global),
            KeyboardShortcut::new("save-draft", "S", &["Ctrl"], ShortcutContext::Local),
            KeyboardShortcut::new("modal-close", "1", &["alt"], ShortcutContext::Modal),
        ];
        let resolved = detect_conflicts(&shortcuts);
        assert_eq!(resolved[0].conflicts, vec!["modal-close"]);
        assert_eq!(resolved[1].conflicts, vec!["save-draft"]);
        assert_eq!(resolved[2].conflicts, vec!["search-focus"]);
        assert_eq!(resolved[3].conflicts, vec!["skip-main"]);
    }

    #[test]
    fn test_disabled_and_disjoint_shortcuts_do_not_conflict() {
        let mut disabled = KeyboardShortcut::new("b", "k", &["ctrl"], ShortcutContext::Local);
        disabled.enabled = false;
        let shortcuts = vec![
            KeyboardShortcut::new("a", "k", &["ctrl"], ShortcutContext::Local),
            disabled,
            KeyboardShortcut::new("c", "k", &["ctrl"], ShortcutContext::Modal),
            KeyboardShortcut::new("d", "k", &["ctrl", "shift"], ShortcutContext::Local),
        ];
        assert!(detect_conflicts(&shortcuts).iter().all(|s| s.conflicts.is_empty()));
    }

    #[test]
    fn test_find_shortcut() {
        let shortcuts = vec![
            KeyboardShortcut::new("skip-nav", "2", &["alt"], ShortcutContext::Global),
            KeyboardShortcut::new("search-focus", "s", &["ctrl"], ShortcutContext::Global),
        ];
        assert_eq!(find_shortcut(&shortcuts, "S", &["CTRL"]).map(|s| s.id.as_str()), Some("search-focus"));
        assert!(find_shortcut(&shortcuts, "s", &["ctrl", "shift"]).is_none());
    }
}
