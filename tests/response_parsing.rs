// Tests for the model reply parser, including malformed replies.
use chrono::NaiveDate;
use teamsync::contract::response::{ResponseOptions, parse_dates, parse_response, split_sections};
use teamsync::model::item::{DateKey, Priority};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn today() -> NaiveDate {
    d(2025, 11, 15)
}

#[test]
fn test_todo_section_with_no_dates() {
    let reply = "=== TODOS ===\n- Finish report\n=== DATES ===\nNo dates found.";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert_eq!(parsed.todos.len(), 1);
    assert_eq!(parsed.todos[0].task, "Finish report");
    assert_eq!(parsed.todos[0].priority, Priority::Medium);
    assert!(parsed.dates.is_empty());
}

#[test]
fn test_reply_without_delimiters_is_empty() {
    let reply = "Sure! Here is what I found:\n- Finish report\nDATE: 2025-12-01 | EVENT: Launch";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert!(parsed.todos.is_empty());
    assert!(parsed.dates.is_empty());
}

#[test]
fn test_sections_in_reverse_order() {
    let reply = "=== DATES ===\nDATE: 2025-12-01 | EVENT: Launch\n=== TODOS ===\n1. Book venue";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert_eq!(parsed.todos[0].task, "Book venue");
    assert!(parsed.dates.get_date(d(2025, 12, 1)).is_some());
}

#[test]
fn test_missing_dates_section_keeps_todos() {
    let reply = "=== TODOS ===\n- Ship it ASAP\n* not a todo line\nplain prose";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert_eq!(parsed.todos.len(), 1);
    assert_eq!(parsed.todos[0].priority, Priority::High);
    assert!(parsed.dates.is_empty());
}

#[test]
fn test_duplicate_todos_are_kept_by_default() {
    let reply = "=== TODOS ===\n- Book venue\n- Book venue\n=== DATES ===\n";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert_eq!(parsed.todos.len(), 2);

    let parsed = parse_response(reply, today(), ResponseOptions { dedupe_todos: true });
    assert_eq!(parsed.todos.len(), 1);
}

#[test]
fn test_priority_is_deterministic() {
    let reply = "=== TODOS ===\n- Maybe refactor later\n- Critical bug fix\n- Write notes\n=== DATES ===";
    let first = parse_response(reply, today(), ResponseOptions::default());
    for _ in 0..5 {
        assert_eq!(parse_response(reply, today(), ResponseOptions::default()), first);
    }
    let prios: Vec<_> = first.todos.iter().map(|t| t.priority).collect();
    assert_eq!(prios, vec![Priority::Low, Priority::High, Priority::Medium]);
}

#[test]
fn test_tbd_lines_never_merge() {
    let section = "DATE: TBD | EVENT: Team offsite\nDATE: tbd | EVENT: Team offsite\nDATE: TBD | EVENT: Retro";
    let map = parse_dates(section, today());
    assert_eq!(map.len(), 3);
    assert!(map.iter().all(|(k, _)| !k.is_scheduled()));
}

#[test]
fn test_fuzzy_fallback_and_tbd_downgrade() {
    let section = "DATE: November 20, 2025 | EVENT: Demo day\n\
                   DATE: next Monday | EVENT: Sprint planning\n\
                   DATE: whenever | EVENT: Pizza night";
    let map = parse_dates(section, today());
    assert_eq!(map.get_date(d(2025, 11, 20)).unwrap().description, "Demo day");
    assert_eq!(map.get_date(d(2025, 11, 17)).unwrap().description, "Sprint planning");
    let unscheduled: Vec<_> = map
        .iter()
        .filter(|(k, _)| matches!(k, DateKey::Unscheduled(_)))
        .map(|(_, e)| e.description.clone())
        .collect();
    assert_eq!(unscheduled, vec!["Pizza night"]);
}

#[test]
fn test_out_of_range_relative_dates_become_unscheduled() {
    let reply = "=== TODOS ===\n- a\n=== DATES ===\n\
                 DATE: in 1000000 years | EVENT: Far future\n\
                 DATE: 4000000000 years from now | EVENT: Further still";
    let parsed = parse_response(reply, today(), ResponseOptions::default());
    assert_eq!(parsed.todos.len(), 1);
    assert_eq!(parsed.dates.len(), 2);
    let events: Vec<_> = parsed
        .dates
        .iter()
        .filter(|(k, _)| matches!(k, DateKey::Unscheduled(_)))
        .map(|(_, e)| e.description.clone())
        .collect();
    assert_eq!(events, vec!["Far future", "Further still"]);
}

#[test]
fn test_past_model_dates_are_dropped() {
    let map = parse_dates(
        "DATE: 2025-11-14 | EVENT: Yesterday's sync\nDATE: 2025-11-15 | EVENT: Today",
        today(),
    );
    assert_eq!(map.len(), 1);
    assert!(map.get_date(today()).is_some());
}

#[test]
fn test_malformed_date_lines_are_skipped() {
    let section = "DATE: 2025-12-01 EVENT: no pipe\n\
                   EVENT: only event\n\
                   DATE: 2025-12-02 | EVENT:\n\
                   DATE: No dates found. | EVENT: n/a\n\
                   - DATE: [2025-12-03] | EVENT: [Release]";
    let map = parse_dates(section, today());
    assert_eq!(map.len(), 1);
    assert_eq!(map.get_date(d(2025, 12, 3)).unwrap().events, vec!["Release"]);
}

#[test]
fn test_split_sections_tolerates_extra_prose() {
    let reply = "Here you go.\n=== TODOS ===\n- a\n=== DATES ===\nDATE: TBD | EVENT: b\n";
    let s = split_sections(reply);
    assert!(s.todos.is_some());
    assert!(s.dates.is_some());
}
