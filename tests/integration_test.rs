// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for wcag-engine

use std::path::Path;
use std::sync::Arc;
use wcag_engine::analyzers::keyboard::TabOrderIssueKind;
use wcag_engine::announce::{AnnouncementQueue, AnnouncementStatus, LiveAnnouncement, SilentSpeaker};
use wcag_engine::config::{load_config, AnnouncementConfig, Config, TabScoring};
use wcag_engine::report::{generate_report, OutputFormat};
use wcag_engine::scanner::{self, run_scan};
use wcag_engine::{Catalog, WcagLevel};

fn fixture(name: &str) -> scanner::ScanInput {
    scanner::load_scan_input(&Path::new("tests/fixtures").join(name)).expect("fixture should load")
}

#[test]
fn test_scan_accessible_fixture() {
    let report = run_scan(&fixture("accessible_scan.json"), &Config::default());

    assert!(report.contrast_errors.is_empty());
    assert_eq!(report.failing_contrast().count(), 0);
    assert_eq!(report.compliance.score, 100.0);
    assert_eq!(report.aggregate.level, Some(WcagLevel::AAA));
    assert!(report.aggregate.overall_score >= 99);
    assert!(report.tab_order.issues.is_empty());
    assert_eq!(report.tab_order.score, 100);
    assert!(report.shortcut_conflicts.is_empty());
}

#[test]
fn test_scan_inaccessible_fixture() {
    let report = run_scan(&fixture("inaccessible_scan.json"), &Config::default());

    // one malformed color, one pair below AA
    assert_eq!(report.contrast.len(), 2);
    assert_eq!(report.contrast_errors.len(), 1);
    assert_eq!(report.contrast_errors[0].pair.selector.as_deref(), Some(".broken"));
    assert_eq!(report.failing_contrast().count(), 1);

    let compliance = &report.compliance;
    assert_eq!(compliance.score, 42.0);
    assert_eq!(compliance.level, None);
    assert_eq!(compliance.failed_criteria, vec!["1.1.1", "1.4.3", "2.4.7"]);
    assert_eq!(compliance.passed_criteria.len(), Catalog::wcag21().len() - 3);
    assert_eq!(compliance.excluded_violations, vec!["legacy-rule"]);
    assert_eq!(compliance.summary.total(), 3);

    // (42 + (100 + 29.03) / 2) / 2 = 53.26
    assert_eq!(report.aggregate.overall_score, 53);
    assert_eq!(report.aggregate.level, None);
    assert_eq!(report.aggregate.below_aa, 1);
}

#[test]
fn test_inaccessible_tab_order() {
    let report = run_scan(&fixture("inaccessible_scan.json"), &Config::default());
    let tab = &report.tab_order;

    let ids: Vec<&str> = tab.sequence.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["promo", "menu", "footer-link", "modal"]);

    let kinds: Vec<(&str, TabOrderIssueKind)> =
        tab.issues.iter().map(|i| (i.element_id.as_str(), i.kind)).collect();
    assert!(kinds.contains(&("dialog-close", TabOrderIssueKind::NegativeTabIndex)));
    assert!(kinds.contains(&("tooltip", TabOrderIssueKind::InvisibleElement)));
    assert!(kinds.contains(&("modal", TabOrderIssueKind::TrappedFocus)));
    assert_eq!(tab.issues.len(), 3);
    assert_eq!(tab.score, 70);

    let conflicts: Vec<&str> = report.shortcut_conflicts.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(conflicts, vec!["save", "share"]);
}

#[test]
fn test_weighted_tab_scoring_from_config() {
    let mut config = Config::default();
    config.tab_order.scoring = TabScoring::Weighted;
    let report = run_scan(&fixture("inaccessible_scan.json"), &config);
    // three warnings at 10 points each
    assert_eq!(report.tab_order.score, 70);
    assert!(report.tab_order.issues.iter().all(|i| i.severity == wcag_engine::Severity::Warning));
}

#[test]
fn test_custom_catalog() {
    let mut input = fixture("inaccessible_scan.json");
    input.catalog = Some(
        Catalog::load(Path::new("tests/fixtures/custom_catalog.json")).expect("catalog should load"),
    );
    let report = run_scan(&input, &Config::default());

    assert_eq!(report.catalog_version, "Internal 1.0");
    assert_eq!(report.compliance.passed_criteria, vec!["2.1.1"]);
    assert_eq!(report.compliance.failed_criteria, vec!["1.1.1", "1.4.3", "2.4.7"]);
}

#[test]
fn test_reports_for_fixture() {
    let report = run_scan(&fixture("inaccessible_scan.json"), &Config::default());

    let text = generate_report(&report, OutputFormat::Text);
    assert!(text.contains("[WCAG-1.1.1] img-alt (critical) at img.hero"));
    assert!(text.contains("Sequence: promo -> menu -> footer-link -> modal"));
    assert!(text.contains("RESULT: NON-CONFORMANT"));

    let json: serde_json::Value =
        serde_json::from_str(&generate_report(&report, OutputFormat::Json)).expect("valid JSON");
    assert_eq!(json["aggregate"]["overall_score"], 53);
    assert_eq!(json["tab_order"]["issues"][0]["kind"], "negative_tab_index");

    let sarif: serde_json::Value =
        serde_json::from_str(&generate_report(&report, OutputFormat::Sarif)).expect("valid JSON");
    let results = sarif["runs"][0]["results"].as_array().expect("results array");
    let rules: Vec<&str> = results.iter().filter_map(|r| r["ruleId"].as_str()).collect();
    assert!(rules.contains(&"WCAG-2.1.2"));
    assert!(rules.contains(&"WCAG-2.1.4"));
    assert!(!rules.contains(&"WCAG-7.7.7"));
    // 3 violations, 1 contrast, 3 tab issues, 2 shortcuts
    assert_eq!(results.len(), 9);
}

#[test]
fn test_missing_scan_file() {
    assert!(scanner::load_scan_input(Path::new("tests/fixtures/does-not-exist.json")).is_err());
}

#[test]
fn test_announcement_replay() {
    let content = std::fs::read_to_string("tests/fixtures/announcements.json").unwrap();
    let announcements: Vec<LiveAnnouncement> = serde_json::from_str(&content).unwrap();
    assert_eq!(announcements[2].context.as_deref(), Some("settings"));

    let queue = AnnouncementQueue::new(Arc::new(SilentSpeaker), &AnnouncementConfig::default());
    let ids: Vec<_> = announcements
        .into_iter()
        .map(|a| {
            let id = queue.enqueue(a);
            if queue.active().is_none() {
                queue.dequeue_next();
            }
            id
        })
        .collect();

    // the assertive item interrupted "Page loaded" and cleared the lower queue
    assert_eq!(queue.status(ids[0]), Some(AnnouncementStatus::Superseded));
    assert_eq!(queue.status(ids[1]), Some(AnnouncementStatus::Superseded));
    assert_eq!(queue.status(ids[2]), Some(AnnouncementStatus::Superseded));
    assert_eq!(queue.status(ids[3]), Some(AnnouncementStatus::Active));
    assert_eq!(queue.active().unwrap().message, "Session expiring in 1 minute");

    assert!(queue.dequeue_next().is_none());
    assert!(queue.is_idle());
    assert_eq!(queue.status(ids[3]), Some(AnnouncementStatus::Delivered));
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wcag-engine.toml");
    std::fs::write(
        &path,
        r#"
[contrast]
aa = 3.0

[announcements]
history_capacity = 3

[compliance]
required_level = "A"
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.contrast.aa, 3.0);
    assert_eq!(config.contrast.aaa, 7.0);
    assert_eq!(config.announcements.history_capacity, 3);
    assert_eq!(config.compliance.required_level, WcagLevel::A);

    // #777 on white is 2.03:1, still below a 3.0 AA threshold
    let report = run_scan(&fixture("inaccessible_scan.json"), &config);
    assert_eq!(report.failing_contrast().count(), 1);
}
