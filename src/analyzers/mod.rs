// SPDX-License-Identifier: PMPL-1.0-or-later
//! Accessibility evaluators.
//!
//! Each module focuses on one WCAG concern. All evaluators are pure and
//! stateless: they hold only immutable configuration, so a single instance
//! can be shared across threads without locking.

pub mod contrast;
pub mod keyboard;
pub mod rules;

pub use contrast::{ContrastCheck, ContrastEvaluator, Recommendation};
pub use keyboard::{FocusableElement, TabOrderAnalyzer, TabOrderIssue, TabOrderIssueKind, TabOrderReport};
pub use rules::{ComplianceResult, ImpactSummary, Violation, WcagRuleEngine};
