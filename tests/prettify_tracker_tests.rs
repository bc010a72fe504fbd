//! Event tracker tests for prettify
//!
//! Drives the tracker through whole runs and checks the rendered report:
//! - Play headers and role grouping
//! - Task timing from start/result instants
//! - Per-host summary and completion line
//! - Configuration from the environment

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use prettify::callback::{ConfigLoader, DisplayEvent, EventTracker, PrettifyConfig};
use prettify::traits::{HostCounts, LifecycleCallback, TaskOutcome, TaskRef};
use serial_test::serial;

fn plain_config() -> PrettifyConfig {
    PrettifyConfig {
        use_colors: false,
        width: Some(60),
        ..PrettifyConfig::default()
    }
}

fn tracker() -> EventTracker<Vec<u8>> {
    EventTracker::new(Vec::new(), plain_config())
}

fn output(tracker: EventTracker<Vec<u8>>) -> String {
    String::from_utf8(tracker.into_inner()).unwrap()
}

fn run_task(
    tracker: &mut EventTracker<Vec<u8>>,
    task: &TaskRef,
    outcome: &TaskOutcome,
    start: Instant,
    millis: u64,
) {
    tracker.on_task_start(task, start).unwrap();
    tracker
        .on_task_result("web1", task, outcome, start + Duration::from_millis(millis))
        .unwrap();
}

// ============================================================================
// Role Grouping
// ============================================================================

#[test]
fn test_role_header_once_per_contiguous_run() {
    let mut tracker = tracker();
    let start = Instant::now();

    for (i, role) in ["web", "web", "db", "db", "web"].iter().enumerate() {
        let task = TaskRef::new(format!("Task {i}"), "command").with_role(*role);
        run_task(&mut tracker, &task, &TaskOutcome::ok(), start, 1);
    }

    let out = output(tracker);
    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with("┌─ ")).collect();
    assert_eq!(headers, vec!["┌─ web", "┌─ db", "┌─ web"]);
}

#[test]
fn test_roleless_task_keeps_current_group() {
    let mut tracker = tracker();
    let start = Instant::now();

    run_task(&mut tracker, &TaskRef::new("A", "ping").with_role("web"), &TaskOutcome::ok(), start, 1);
    run_task(&mut tracker, &TaskRef::new("B", "ping"), &TaskOutcome::ok(), start, 1);
    run_task(&mut tracker, &TaskRef::new("C", "ping").with_role("web"), &TaskOutcome::ok(), start, 1);

    assert_eq!(tracker.state().last_role.as_deref(), Some("web"));
    let out = output(tracker);
    assert_eq!(out.matches("┌─ ").count(), 1);
}

#[test]
fn test_role_from_parent_and_path() {
    let mut tracker = tracker();
    let start = Instant::now();

    let included = TaskRef::new("Included", "include_tasks")
        .with_parent(TaskRef::new("Block", "block").with_role("common"));
    let from_path = TaskRef::new("Pathed", "template").with_path("/srv/site/roles/nginx/tasks/main.yml:4");

    run_task(&mut tracker, &included, &TaskOutcome::ok(), start, 1);
    run_task(&mut tracker, &from_path, &TaskOutcome::ok(), start, 1);

    let out = output(tracker);
    let headers: Vec<&str> = out.lines().filter(|l| l.starts_with("┌─ ")).collect();
    assert_eq!(headers, vec!["┌─ common", "┌─ nginx"]);
}

// ============================================================================
// Whole Runs
// ============================================================================

#[test]
fn test_full_run_from_events() {
    let mut tracker = tracker();
    let start = Instant::now();
    let task = TaskRef::new("Install package", "apt").with_role("web");

    let events = [
        (DisplayEvent::RunStarted { engine_version: Some("2.15.3".into()) }, 0),
        (DisplayEvent::PlayStarted { name: "Deploy".into() }, 0),
        (DisplayEvent::TaskStarted { task: task.clone() }, 10),
        (
            DisplayEvent::TaskResult {
                host: "web1".into(),
                task: task.clone(),
                outcome: TaskOutcome::changed(),
            },
            130,
        ),
    ];
    for (event, offset) in &events {
        tracker
            .handle_at(event, start + Duration::from_millis(*offset))
            .unwrap();
    }

    assert_eq!(tracker.state().engine_version.major, 2);
    assert_eq!(tracker.state().engine_version.minor, 15);

    let out = output(tracker);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        &lines[..5],
        &["", "PLAY [Deploy]", "", "", "┌─ web"][..]
    );
    assert_eq!(
        lines[5],
        format!("  ~ Install package {}120ms CHANGED    ", ".".repeat(23))
    );
}

#[test]
fn test_summary_for_single_host() {
    let mut tracker = tracker();
    let start = Instant::now();
    tracker.on_run_start(None, start).unwrap();

    let mut stats = BTreeMap::new();
    stats.insert(
        "web1".to_string(),
        HostCounts {
            ok: 5,
            changed: 2,
            failures: 0,
            unreachable: 0,
            skipped: 1,
        },
    );
    let args = vec!["ansible-playbook".to_string(), "site.yml".to_string()];
    tracker
        .on_run_finish(&stats, &args, start + Duration::from_millis(3_040))
        .unwrap();

    let out = output(tracker);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "",
            "  web1",
            "    ✓ 5 successful",
            "    ~ 2 changed",
            "    → 1 skipped",
            "",
            "✅ Playbook completed successfully in 3.0s",
            "",
        ]
    );
}

#[test]
fn test_failed_task_prints_error_and_continues() {
    let mut tracker = tracker();
    let start = Instant::now();

    run_task(
        &mut tracker,
        &TaskRef::new("Start service", "service"),
        &TaskOutcome::failed("Unit not found"),
        start,
        95,
    );
    run_task(&mut tracker, &TaskRef::new("Next", "ping"), &TaskOutcome::ok(), start, 2);

    let out = output(tracker);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("  ✗ Start service"));
    assert_eq!(lines[1], "    Error: Unit not found");
    assert!(lines[2].starts_with("  ✓ Next"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
#[serial]
fn test_env_configures_tracker() {
    std::env::set_var("PRETTIFY_SHOW_TIMING", "false");
    std::env::set_var("PRETTIFY_WIDTH", "72");
    std::env::set_var("PRETTIFY_NO_COLOR", "1");

    let config = ConfigLoader::new().without_standard_locations().load().unwrap();

    std::env::remove_var("PRETTIFY_SHOW_TIMING");
    std::env::remove_var("PRETTIFY_WIDTH");
    std::env::remove_var("PRETTIFY_NO_COLOR");

    assert!(!config.show_timing);
    assert!(!config.use_colors);
    assert_eq!(config.width, Some(72));

    let mut tracker = EventTracker::new(Vec::new(), config);
    let start = Instant::now();
    run_task(&mut tracker, &TaskRef::new("Ping", "ping"), &TaskOutcome::ok(), start, 40);

    let out = output(tracker);
    let line = out.lines().next().unwrap();
    assert!(!line.contains("ms"));
    assert_eq!(line.chars().count(), 72);
}

#[test]
#[serial]
fn test_no_color_env_disables_colors() {
    std::env::set_var("NO_COLOR", "1");
    let config = ConfigLoader::new().without_standard_locations().load().unwrap();
    std::env::remove_var("NO_COLOR");

    assert!(!config.use_colors);
}

#[test]
#[serial]
fn test_ansible_prefixed_env_is_honoured() {
    std::env::set_var("ANSIBLE_PRETTIFY_SHOW_TIMING", "false");
    std::env::set_var("ANSIBLE_PRETTIFY_SHOW_TIMESTAMPS", "true");

    let config = ConfigLoader::new().without_standard_locations().load().unwrap();

    std::env::remove_var("ANSIBLE_PRETTIFY_SHOW_TIMING");
    std::env::remove_var("ANSIBLE_PRETTIFY_SHOW_TIMESTAMPS");

    assert!(!config.show_timing);
    assert!(config.show_timestamps);
}

#[test]
#[serial]
fn test_prettify_prefix_wins_over_ansible_prefix() {
    std::env::set_var("ANSIBLE_PRETTIFY_SHOW_TIMING", "false");
    std::env::set_var("PRETTIFY_SHOW_TIMING", "true");

    let config = ConfigLoader::new().without_standard_locations().load().unwrap();

    std::env::remove_var("ANSIBLE_PRETTIFY_SHOW_TIMING");
    std::env::remove_var("PRETTIFY_SHOW_TIMING");

    assert!(config.show_timing);
}

#[test]
#[serial]
fn test_extra_env_prefix() {
    std::env::set_var("DEPLOYBOT_WIDTH", "88");

    let config = ConfigLoader::new()
        .without_standard_locations()
        .with_env_prefix("DEPLOYBOT")
        .load()
        .unwrap();

    std::env::remove_var("DEPLOYBOT_WIDTH");

    assert_eq!(config.width, Some(88));
}
