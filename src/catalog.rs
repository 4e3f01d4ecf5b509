// SPDX-License-Identifier: PMPL-1.0-or-later
//! WCAG success criterion catalog.
//!
//! The built-in catalog is a versioned, immutable table loaded once per
//! process. It is configuration rather than logic: callers may score against
//! a custom catalog loaded from JSON instead.

use crate::error::{EngineError, Result};
use crate::model::{Principle, WcagLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// A single WCAG success criterion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WcagCriterion {
    /// Dotted criterion number, e.g. "1.4.3"
    pub id: String,
    pub level: WcagLevel,
    pub principle: Principle,
    pub title: String,
}

impl WcagCriterion {
    /// Create a criterion, validating the id format
    pub fn new(id: &str, level: WcagLevel, principle: Principle, title: &str) -> Result<Self> {
        validate_criterion_id(id)?;
        Ok(Self {
            id: id.to_string(),
            level,
            principle,
            title: title.to_string(),
        })
    }
}

/// Check that an id has the `D.D.D` shape (each part one or more digits)
pub fn validate_criterion_id(id: &str) -> Result<()> {
    let parts: Vec<&str> = id.split('.').collect();
    let well_formed = parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()));
    if well_formed {
        Ok(())
    } else {
        Err(EngineError::InvalidCriterionId(id.to_string()))
    }
}

/// An ordered, versioned set of criteria
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    pub criteria: Vec<WcagCriterion>,
}

impl Catalog {
    /// The built-in WCAG 2.1 catalog
    pub fn wcag21() -> &'static Catalog {
        &WCAG21
    }

    /// Load a custom catalog from a JSON file
    pub fn load(path: &Path) -> Result<Catalog> {
        let content = std::fs::read_to_string(path)?;
        Catalog::from_json(&content)
    }

    /// Parse a custom catalog from JSON, validating ids and uniqueness
    pub fn from_json(json: &str) -> Result<Catalog> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every id is well formed and unique
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for criterion in &self.criteria {
            validate_criterion_id(&criterion.id)?;
            if !seen.insert(criterion.id.as_str()) {
                return Err(EngineError::Config(format!(
                    "duplicate criterion {} in catalog {}",
                    criterion.id, self.version
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&WcagCriterion> {
        self.criteria.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Criteria at or below the given level
    pub fn up_to_level(&self, level: WcagLevel) -> Vec<&WcagCriterion> {
        self.criteria.iter().filter(|c| c.level <= level).collect()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }
}

static WCAG21: LazyLock<Catalog> = LazyLock::new(|| {
    use Principle::*;
    use WcagLevel::*;

    let table: &[(&str, WcagLevel, Principle, &str)] = &[
        ("1.1.1", A, Perceivable, "Non-text Content"),
        ("1.3.1", A, Perceivable, "Info and Relationships"),
        ("1.3.2", A, Perceivable, "Meaningful Sequence"),
        ("1.3.3", A, Perceivable, "Sensory Characteristics"),
        ("1.4.1", A, Perceivable, "Use of Color"),
        ("1.4.2", A, Perceivable, "Audio Control"),
        ("2.1.1", A, Operable, "Keyboard"),
        ("2.1.2", A, Operable, "No Keyboard Trap"),
        ("2.2.1", A, Operable, "Timing Adjustable"),
        ("2.2.2", A, Operable, "Pause, Stop, Hide"),
        ("2.3.1", A, Operable, "Three Flashes or Below Threshold"),
        ("2.4.1", A, Operable, "Bypass Blocks"),
        ("2.4.2", A, Operable, "Page Titled"),
        ("2.4.3", A, Operable, "Focus Order"),
        ("2.4.4", A, Operable, "Link Purpose (In Context)"),
        ("3.1.1", A, Understandable, "Language of Page"),
        ("3.2.1", A, Understandable, "On Focus"),
        ("3.2.2", A, Understandable, "On Input"),
        ("3.3.1", A, Understandable, "Error Identification"),
        ("3.3.2", A, Understandable, "Labels or Instructions"),
        ("4.1.1", A, Robust, "Parsing"),
        ("4.1.2", A, Robust, "Name, Role, Value"),
        ("1.2.4", AA, Perceivable, "Captions (Live)"),
        ("1.2.5", AA, Perceivable, "Audio Description (Prerecorded)"),
        ("1.3.4", AA, Perceivable, "Orientation"),
        ("1.3.5", AA, Perceivable, "Identify Input Purpose"),
        ("1.4.3", AA, Perceivable, "Contrast (Minimum)"),
        ("1.4.4", AA, Perceivable, "Resize Text"),
        ("1.4.5", AA, Perceivable, "Images of Text"),
        ("1.4.10", AA, Perceivable, "Reflow"),
        ("1.4.11", AA, Perceivable, "Non-text Contrast"),
        ("1.4.12", AA, Perceivable, "Text Spacing"),
        ("1.4.13", AA, Perceivable, "Content on Hover or Focus"),
        ("2.4.5", AA, Operable, "Multiple Ways"),
        ("2.4.6", AA, Operable, "Headings and Labels"),
        ("2.4.7", AA, Operable, "Focus Visible"),
        ("2.5.1", AA, Operable, "Pointer Gestures"),
        ("2.5.2", AA, Operable, "Pointer Cancellation"),
        ("2.5.3", AA, Operable, "Label in Name"),
        ("2.5.4", AA, Operable, "Motion Actuation"),
        ("3.1.2", AA, Understandable, "Language of Parts"),
        ("3.2.3", AA, Understandable, "Consistent Navigation"),
        ("3.2.4", AA, Understandable, "Consistent Identification"),
        ("3.3.3", AA, Understandable, "Error Suggestion"),
        ("3.3.4", AA, Understandable, "Error Prevention (Legal, Financial, Data)"),
        ("4.1.3", AA, Robust, "Status Messages"),
        ("1.4.6", AAA, Perceivable, "Contrast (Enhanced)"),
        ("1.4.8", AAA, Perceivable, "Visual Presentation"),
        ("2.1.3", AAA, Operable, "Keyboard (No Exception)"),
        ("2.2.3", AAA, Operable, "No Timing"),
        ("2.4.8", AAA, Operable, "Location"),
        ("2.4.9", AAA, Operable, "Link Purpose (Link Only)"),
        ("2.4.10", AAA, Operable, "Section Headings"),
        ("3.1.5", AAA, Understandable, "Reading Level"),
    ];

    Catalog {
        version: "WCAG 2.1".to_string(),
        criteria: table
            .iter()
            .map(|&(id, level, principle, title)| WcagCriterion {
                id: id.to_string(),
                level,
                principle,
                title: title.to_string(),
            })
            .collect(),
    }
});
