// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast evaluator - WCAG 1.4.3 Contrast (Minimum), 1.4.6 Contrast (Enhanced)
//!
//! Computes a contrast ratio from perceptual-weight luminance and classifies
//! it against the configured thresholds:
//! - AA: 4.5:1 for normal text
//! - AAA: 7:1 for normal text
//!
//! Pure and cheap; safe to call on every keystroke of a theme editor.

use crate::color::ColorValue;
use crate::config::ContrastThresholds;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Advice derived from the AA/AAA flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Fails AA
    Insufficient,
    /// Passes AA but not AAA
    MeetsAa,
    /// Passes AAA
    ExceedsAaa,
}

impl Recommendation {
    pub fn from_flags(wcag_aa: bool, wcag_aaa: bool) -> Self {
        match (wcag_aa, wcag_aaa) {
            (_, true) => Recommendation::ExceedsAaa,
            (true, false) => Recommendation::MeetsAa,
            (false, false) => Recommendation::Insufficient,
        }
    }

    /// Human-readable advice
    pub fn message(&self) -> &'static str {
        match self {
            Recommendation::ExceedsAaa => "Excellent contrast, exceeds WCAG AAA",
            Recommendation::MeetsAa => "Good contrast, meets WCAG AA",
            Recommendation::Insufficient => "Insufficient contrast, consider adjusting colors",
        }
    }
}

/// Result of evaluating one foreground/background pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContrastCheck {
    pub foreground: ColorValue,
    pub background: ColorValue,
    /// Contrast ratio, always >= 1
    pub ratio: f64,
    pub wcag_aa: bool,
    pub wcag_aaa: bool,
    /// Advisory 0-100 score, linear in ratio up to the score target
    pub score: f64,
    pub recommendation: Recommendation,
}

/// Contrast evaluator with fixed thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct ContrastEvaluator {
    thresholds: ContrastThresholds,
}

impl ContrastEvaluator {
    pub fn new(thresholds: ContrastThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ContrastThresholds {
        &self.thresholds
    }

    /// Evaluate a parsed color pair
    pub fn evaluate(&self, foreground: ColorValue, background: ColorValue) -> ContrastCheck {
        let ratio = contrast_ratio(foreground, background);
        let wcag_aa = ratio >= self.thresholds.aa;
        // AAA implies AA even if someone hands us inverted thresholds
        let wcag_aaa = wcag_aa && ratio >= self.thresholds.aaa;
        let score = (ratio / self.thresholds.score_target * 100.0).min(100.0);

        debug!(
            "contrast {} on {}: {:.2}:1 (AA={}, AAA={})",
            foreground, background, ratio, wcag_aa, wcag_aaa
        );

        ContrastCheck {
            foreground,
            background,
            ratio,
            wcag_aa,
            wcag_aaa,
            score,
            recommendation: Recommendation::from_flags(wcag_aa, wcag_aaa),
        }
    }

    /// Parse both colors, then evaluate
    pub fn evaluate_str(&self, foreground: &str, background: &str) -> Result<ContrastCheck> {
        let fg = ColorValue::parse(foreground)?;
        let bg = ColorValue::parse(background)?;
        Ok(self.evaluate(fg, bg))
    }
}

/// Contrast ratio between two colors, `(L1 + 0.05) / (L2 + 0.05)` with L1 the lighter
pub fn contrast_ratio(a: ColorValue, b: ColorValue) -> f64 {
    let la = a.luminance();
    let lb = b.luminance();
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Evaluate with the default WCAG thresholds
pub fn evaluate_contrast(foreground: ColorValue, background: ColorValue) -> ContrastCheck {
    ContrastEvaluator::default().evaluate(foreground, background)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(hex: &str) -> ColorValue {
        ColorValue::parse(hex).unwrap()
    }

    #[test]
    fn test_black_on_white() {
        let check = evaluate_contrast(c("#000000"), c("#FFFFFF"));
        assert!((check.ratio - 21.0).abs() < 0.01, "got {:.3}", check.ratio);
        assert!(check.wcag_aa);
        assert!(check.wcag_aaa);
        assert_eq!(check.score, 100.0);
        assert_eq!(check.recommendation, Recommendation::ExceedsAaa);
    }

    #[test]
    fn test_identical_colors() {
        for hex in ["#000", "#fff", "#808080", "#0066cc", "#123456"] {
            let check = evaluate_contrast(c(hex), c(hex));
            assert_eq!(check.ratio, 1.0);
            assert!(!check.wcag_aa);
            assert!(!check.wcag_aaa);
            assert_eq!(check.recommendation, Recommendation::Insufficient);
        }
    }

    #[test]
    fn test_symmetry_and_flag_implication() {
        let samples = [
            "#000", "#fff", "#777", "#595959", "#aaa", "#ccc", "#ff0000", "#00ff00",
            "#0000ff", "#ffff80", "#000080", "#66ccff", "#333333",
        ];
        for fg in samples {
            for bg in samples {
                let ab = evaluate_contrast(c(fg), c(bg));
                let ba = evaluate_contrast(c(bg), c(fg));
                assert_eq!(ab.ratio, ba.ratio, "{} vs {}", fg, bg);
                assert!(ab.ratio >= 1.0);
                assert!(!ab.wcag_aaa || ab.wcag_aa);
                assert!((0.0..=100.0).contains(&ab.score));
            }
        }
    }

    #[test]
    fn test_score_monotonic_in_ratio() {
        let white = ColorValue::WHITE;
        let mut last = (0.0, 0.0);
        for v in (0..=255u8).rev() {
            let check = evaluate_contrast(ColorValue::new(v, v, v), white);
            assert!(check.ratio >= last.0);
            assert!(check.score >= last.1);
            last = (check.ratio, check.score);
        }
    }

    #[test]
    fn test_meets_aa_only() {
        let check = evaluate_contrast(c("#2a2a2a"), c("#666666"));
        assert!(check.ratio < 4.5);
        assert_eq!(check.recommendation, Recommendation::Insufficient);

        // #333333 has luminance 0.2: (0.2 + 0.05) / 0.05 = 5.0
        let check = evaluate_contrast(c("#000000"), c("#333333"));
        assert!((check.ratio - 5.0).abs() < 1e-9, "got {:.4}", check.ratio);
        assert_eq!(check.recommendation, Recommendation::MeetsAa);
        assert!(check.wcag_aa && !check.wcag_aaa);
    }

    #[test]
    fn test_evaluate_str_rejects_malformed() {
        let evaluator = ContrastEvaluator::default();
        assert!(evaluator.evaluate_str("#000", "not-a-color").is_err());
        assert!(evaluator.evaluate_str("#000", "#fff").is_ok());
    }

    #[test]
    fn test_custom_thresholds() {
        let evaluator = ContrastEvaluator::new(ContrastThresholds {
            aa: 3.0,
            aaa: 4.5,
            score_target: 4.5,
        });
        let check = evaluator.evaluate_str("#000000", "#333333").unwrap();
        assert!(check.wcag_aaa);
        assert_eq!(check.score, 100.0);
    }
}
