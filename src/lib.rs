// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcag-engine - WCAG compliance evaluation engine
//!
//! Given a description of a document's interactive elements and color scheme,
//! computes WCAG conformance scores, classifies color pairs against AA/AAA
//! contrast thresholds, validates keyboard tab order, and manages a priority
//! queue of assistive-technology announcements.
//!
//! Scores and recommendations are advisory, not a legal compliance guarantee.
//!
//! ## Components
//!
//! - **Contrast** (1.4.3/1.4.6): contrast ratio and AA/AAA classification
//! - **Rules**: violation scoring against a versioned criterion catalog
//! - **Keyboard** (2.1.1/2.4.3): tab sequence, tab order issues, shortcut conflicts
//! - **Announcements** (4.1.3): live region priority queue with injected speech
//! - **Aggregate**: composite score and advertised conformance level
//! - **Themes**: built-in high contrast themes and their validation
//!
//! ## Example
//!
//! ```
//! use wcag_engine::{aggregate, evaluate_contrast, score_compliance, Catalog, ColorValue};
//!
//! let check = evaluate_contrast(ColorValue::BLACK, ColorValue::WHITE);
//! assert!(check.wcag_aaa);
//!
//! let result = score_compliance(&[], Catalog::wcag21());
//! let score = aggregate(&[check], &result);
//! assert_eq!(score.overall_score, 100);
//! ```

pub mod aggregate;
pub mod analyzers;
pub mod announce;
pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod scanner;
pub mod theme;

pub use aggregate::{aggregate, AggregateScore};
pub use analyzers::contrast::evaluate_contrast;
pub use analyzers::keyboard::analyze_tab_order;
pub use analyzers::rules::score_compliance;
pub use announce::{AnnouncementQueue, LiveAnnouncement};
pub use catalog::{Catalog, WcagCriterion};
pub use color::ColorValue;
pub use config::{load_config, Config};
pub use error::{EngineError, Result};
pub use model::{Impact, Severity, WcagLevel};
