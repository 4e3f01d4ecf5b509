// SPDX-License-Identifier: PMPL-1.0-or-later
//! Visual themes and theme contrast validation.
//!
//! Ships the built-in high contrast themes and re-evaluates a theme's key
//! color pairs whenever it changes.

use crate::analyzers::{ContrastCheck, ContrastEvaluator};
use crate::color::ColorValue;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Kind of theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeKind {
    HighContrast,
    Dark,
    Light,
    Custom,
}

/// Palette of a theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: ColorValue,
    pub secondary: ColorValue,
    pub background: ColorValue,
    pub surface: ColorValue,
    pub text: ColorValue,
    pub text_secondary: ColorValue,
    pub border: ColorValue,
    pub focus: ColorValue,
}

/// A named color theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualTheme {
    pub id: String,
    pub name: String,
    pub kind: ThemeKind,
    pub colors: ThemeColors,
}

/// Contrast validation of one theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeReport {
    pub theme_id: String,
    /// Text on background, then primary on background
    pub checks: Vec<ContrastCheck>,
    pub average_ratio: f64,
    /// Every check passes AA
    pub compliant: bool,
}

/// Evaluate the text and primary colors against the background
pub fn validate_theme(theme: &VisualTheme, evaluator: &ContrastEvaluator) -> ThemeReport {
    let checks = vec![
        evaluator.evaluate(theme.colors.text, theme.colors.background),
        evaluator.evaluate(theme.colors.primary, theme.colors.background),
    ];
    let average_ratio = checks.iter().map(|c| c.ratio).sum::<f64>() / checks.len() as f64;
    let compliant = checks.iter().all(|c| c.wcag_aa);

    ThemeReport {
        theme_id: theme.id.clone(),
        checks,
        average_ratio,
        compliant,
    }
}

/// The built-in high contrast themes
pub fn builtin_themes() -> &'static [VisualTheme] {
    &BUILTIN_THEMES
}

/// Look up a built-in theme by id
pub fn builtin_theme(id: &str) -> Option<&'static VisualTheme> {
    BUILTIN_THEMES.iter().find(|t| t.id == id)
}

fn hex(r: u8, g: u8, b: u8) -> ColorValue {
    ColorValue::new(r, g, b)
}

static BUILTIN_THEMES: LazyLock<Vec<VisualTheme>> = LazyLock::new(|| {
    vec![
        VisualTheme {
            id: "hc-black-white".to_string(),
            name: "Black on White".to_string(),
            kind: ThemeKind::HighContrast,
            colors: ThemeColors {
                primary: hex(0x00, 0x00, 0x00),
                secondary: hex(0x33, 0x33, 0x33),
                background: hex(0xff, 0xff, 0xff),
                surface: hex(0xf8, 0xf9, 0xfa),
                text: hex(0x00, 0x00, 0x00),
                text_secondary: hex(0x33, 0x33, 0x33),
                border: hex(0x00, 0x00, 0x00),
                focus: hex(0x00, 0x66, 0xcc),
            },
        },
        VisualTheme {
            id: "hc-white-black".to_string(),
            name: "White on Black".to_string(),
            kind: ThemeKind::HighContrast,
            colors: ThemeColors {
                primary: hex(0xff, 0xff, 0xff),
                secondary: hex(0xcc, 0xcc, 0xcc),
                background: hex(0x00, 0x00, 0x00),
                surface: hex(0x11, 0x11, 0x11),
                text: hex(0xff, 0xff, 0xff),
                text_secondary: hex(0xcc, 0xcc, 0xcc),
                border: hex(0xff, 0xff, 0xff),
                focus: hex(0x66, 0xcc, 0xff),
            },
        },
        VisualTheme {
            id: "hc-blue-yellow".to_string(),
            name: "Blue on Yellow".to_string(),
            kind: ThemeKind::HighContrast,
            colors: ThemeColors {
                primary: hex(0x00, 0x00, 0x80),
                secondary: hex(0x00, 0x00, 0x66),
                background: hex(0xff, 0xff, 0x80),
                surface: hex(0xff, 0xff, 0xcc),
                text: hex(0x00, 0x00, 0x80),
                text_secondary: hex(0x00, 0x00, 0x66),
                border: hex(0x00, 0x00, 0x80),
                focus: hex(0xff, 0x00, 0x80),
            },
        },
    ]
});
