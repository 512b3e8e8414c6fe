// File: ./src/contract/response.rs
//! Defensive parsing of the model's two-section reply.
//!
//! Nothing in here returns an error: malformed or partial replies degrade to
//! fewer (possibly zero) entries.
use crate::contract::prompt::{DATE_MARKER, EVENT_MARKER, SECTION_DELIMITER, TBD};
use crate::model::fuzzy::parse_fuzzy_date;
use crate::model::item::{DateEntry, DateKey, DateMap, DateSource, Priority, TodoEntry};
use chrono::NaiveDate;
use std::collections::HashSet;

const HIGH_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "as soon as possible",
    "immediately",
    "critical",
    "important",
    "deadline",
    "high priority",
];

const LOW_KEYWORDS: &[&str] = &[
    "later",
    "eventually",
    "someday",
    "when possible",
    "optional",
    "low priority",
    "nice to have",
    "if time",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseOptions {
    /// Drop todos whose normalized text was already seen in the same reply.
    pub dedupe_todos: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResponse {
    pub todos: Vec<TodoEntry>,
    pub dates: DateMap,
}

/// Raw text of the two sections, when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sections<'a> {
    pub todos: Option<&'a str>,
    pub dates: Option<&'a str>,
}

/// Splits on the section delimiter and picks the part after each header.
///
/// Header parts are the single-line fragments between two delimiters, so a
/// body line that happens to mention "dates" is never taken for a header.
pub fn split_sections(response: &str) -> Sections<'_> {
    let parts: Vec<&str> = response.split(SECTION_DELIMITER).collect();
    let mut sections = Sections::default();
    if parts.len() < 2 {
        return sections;
    }

    for (i, part) in parts.iter().enumerate() {
        if part.contains('\n') {
            continue;
        }
        let header = part.trim().to_lowercase();
        let Some(body) = parts.get(i + 1).copied() else {
            continue;
        };
        if sections.todos.is_none() && header.contains("todos") {
            sections.todos = Some(body);
        } else if sections.dates.is_none() && header.contains("dates") {
            sections.dates = Some(body);
        }
    }
    sections
}

/// Keyword scan; urgency wins over deferral when both appear.
pub fn infer_priority(task: &str) -> Priority {
    let lower = task.to_lowercase();
    if HIGH_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Priority::High
    } else if LOW_KEYWORDS.iter().any(|k| lower.contains(k)) {
        Priority::Low
    } else {
        Priority::Medium
    }
}

pub fn parse_todos(section: &str, opts: ResponseOptions) -> Vec<TodoEntry> {
    let mut seen = HashSet::new();
    let mut todos = Vec::new();

    for line in section.lines() {
        let line = line.trim();
        let qualifies = line.starts_with('-') || line.starts_with(|c: char| c.is_ascii_digit());
        if !qualifies {
            continue;
        }
        if line.to_lowercase().contains("no action items found") {
            continue;
        }
        let task = strip_list_marker(line);
        if task.is_empty() {
            continue;
        }
        if opts.dedupe_todos && !seen.insert(normalize(task)) {
            log::debug!("Skipping duplicate todo: {}", task);
            continue;
        }
        todos.push(TodoEntry {
            task: task.to_string(),
            priority: infer_priority(task),
        });
    }
    todos
}

/// Reads `DATE: ... | EVENT: ...` lines into a model-sourced date map.
pub fn parse_dates(section: &str, today: NaiveDate) -> DateMap {
    let mut map = DateMap::new();

    for line in section.lines() {
        let line = line.trim();
        if !(line.contains(DATE_MARKER) && line.contains(EVENT_MARKER)) {
            continue;
        }
        let Some((date_part, event_part)) = line.split_once('|') else {
            log::debug!("Date line without separator: {}", line);
            continue;
        };
        let date_text = after_marker(date_part, DATE_MARKER);
        let event = after_marker(event_part, EVENT_MARKER);

        if is_no_dates(date_text) || is_no_dates(event) {
            continue;
        }
        if event.is_empty() {
            continue;
        }

        if date_text.eq_ignore_ascii_case(TBD) {
            map.insert_unscheduled(event, DateSource::Model);
            continue;
        }

        let resolved = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .ok()
            .or_else(|| parse_fuzzy_date(date_text, today));
        let Some(date) = resolved else {
            log::debug!("Unresolvable date '{}', keeping as TBD", date_text);
            map.insert_unscheduled(event, DateSource::Model);
            continue;
        };
        if date < today {
            log::debug!("Dropping past date {} ({})", date, event);
            continue;
        }

        match map.entry_mut(date) {
            Some(entry) => {
                entry.description = event.to_string();
                entry.push_event(event);
            }
            None => {
                let mut entry = DateEntry::new(event, DateSource::Model);
                entry.push_event(event);
                map.insert(DateKey::Scheduled(date), entry);
            }
        }
    }
    map
}

pub fn parse_response(response: &str, today: NaiveDate, opts: ResponseOptions) -> ParsedResponse {
    let sections = split_sections(response);
    if sections.todos.is_none() && sections.dates.is_none() {
        log::warn!("Model reply had no recognizable sections");
    }

    let todos = sections
        .todos
        .map(|s| parse_todos(s, opts))
        .unwrap_or_default();
    let dates = sections
        .dates
        .map(|s| parse_dates(s, today))
        .unwrap_or_default();

    log::debug!(
        "Model reply parsed: {} todos, {} dates",
        todos.len(),
        dates.len()
    );
    ParsedResponse { todos, dates }
}

fn strip_list_marker(line: &str) -> &str {
    let rest = line.trim_start_matches(['-', '*', '•', ' ', '\t']);
    let digits = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    let rest = if digits.len() != rest.len()
        && let Some(after) = digits.strip_prefix(['.', ')'])
    {
        after
    } else {
        rest
    };
    rest.trim()
}

fn after_marker<'a>(part: &'a str, marker: &str) -> &'a str {
    let tail = match part.find(marker) {
        Some(idx) => &part[idx + marker.len()..],
        None => part,
    };
    tail.trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '"' | '*'))
}

fn is_no_dates(s: &str) -> bool {
    s.to_lowercase().contains("no dates found")
}

fn normalize(task: &str) -> String {
    task.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['.', '!'])
        .to_string()
}
