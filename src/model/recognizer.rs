// File: ./src/model/recognizer.rs
//! Regex date scan over raw transcript text.
//!
//! Three inline shapes are recognised per line:
//! - `November 15th, 2025` (month name, day, year)
//! - `15/11/25` or `15-11-2025` (day, month, year; two digit years are 20xx)
//! - `2025-11-15` or `2025/11/15` (year, month, day)
//!
//! Numeric shapes must sit on word boundaries, so the tail of `2030-10-31` is
//! never re-read as a day-month-year triple.
//!
//! Bracketed message timestamps such as `[11/15/25, 2:30 PM]` only register a
//! placeholder entry for their day. Their digits are blanked before the inline
//! scan so `[11/12/25, ...]` is not also read as 11 December.
use crate::model::fuzzy::parse_month;
use crate::model::item::{
    DateCandidate, DateEntry, DateKey, DateMap, DateSource, TIMESTAMP_PLACEHOLDER, truncate_chars,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\d{1,2})/(\d{1,2})/(\d{2}),\s*(\d{1,2}):(\d{2})\s*(AM|PM)\]")
        .expect("timestamp pattern")
});

static MONTH_NAME_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(January|February|March|April|May|June|July|August|September|October|November|December)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})",
    )
    .expect("month name pattern")
});

static DAY_MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})\b").expect("dmy pattern"));

static YEAR_MONTH_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b").expect("ymd pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    MonthNameDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// Storage bounds applied to recognised event text.
#[derive(Debug, Clone, Copy)]
pub struct ScanLimits {
    pub description: usize,
    pub event: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            description: 100,
            event: 80,
        }
    }
}

/// Every date mention in `text` on or after `today`, in line order.
pub fn find_candidates(text: &str, today: NaiveDate) -> Vec<DateCandidate> {
    let mut out = Vec::new();

    for line in text.lines() {
        let stamp = TIMESTAMP.captures(line);
        if let Some(caps) = &stamp
            && let Some(date) = timestamp_date(caps)
            && date >= today
        {
            out.push(DateCandidate {
                key: DateKey::Scheduled(date),
                source: DateSource::Regex,
                raw_event_text: String::new(),
                provenance_line: Some(line.to_string()),
            });
        }

        let masked = stamp
            .and_then(|caps| caps.get(0))
            .map(|m| mask_span(line, m.range()));
        let inline_line = masked.as_deref().unwrap_or(line);

        let patterns: [(&Regex, FieldOrder); 3] = [
            (&*MONTH_NAME_DATE, FieldOrder::MonthNameDayYear),
            (&*DAY_MONTH_YEAR, FieldOrder::DayMonthYear),
            (&*YEAR_MONTH_DAY, FieldOrder::YearMonthDay),
        ];
        for (re, order) in patterns {
            for caps in re.captures_iter(inline_line) {
                let Some(date) = inline_date(&caps, order) else {
                    continue;
                };
                if date < today {
                    continue;
                }
                out.push(DateCandidate {
                    key: DateKey::Scheduled(date),
                    source: DateSource::Regex,
                    raw_event_text: event_text(line),
                    provenance_line: Some(line.to_string()),
                });
            }
        }
    }

    out
}

/// Folds regex candidates into a date map.
///
/// The first inline mention of a date sets its description; later distinct
/// mentions only extend the event list. Timestamp-only dates keep a placeholder.
pub fn accumulate(candidates: &[DateCandidate], limits: ScanLimits) -> DateMap {
    let mut map = DateMap::new();
    for c in candidates {
        let DateKey::Scheduled(date) = c.key else {
            continue;
        };
        if c.raw_event_text.is_empty() {
            if map.get_date(date).is_none() {
                map.insert(
                    c.key,
                    DateEntry::new(TIMESTAMP_PLACEHOLDER, DateSource::Regex),
                );
            }
            continue;
        }

        let description = truncate_chars(&c.raw_event_text, limits.description);
        let event = truncate_chars(&c.raw_event_text, limits.event);
        match map.entry_mut(date) {
            Some(entry) => {
                if entry.is_placeholder() {
                    entry.description = description;
                }
                entry.push_event(event);
            }
            None => {
                let mut entry = DateEntry::new(description, DateSource::Regex);
                entry.push_event(event);
                map.insert(c.key, entry);
            }
        }
    }
    map
}

pub fn scan_dates(text: &str, today: NaiveDate, limits: ScanLimits) -> DateMap {
    let candidates = find_candidates(text, today);
    let map = accumulate(&candidates, limits);
    log::debug!(
        "Regex scan found {} candidates across {} dates",
        candidates.len(),
        map.len()
    );
    map
}

fn timestamp_date(caps: &Captures) -> Option<NaiveDate> {
    let month = caps[1].parse::<u32>().ok()?;
    let day = caps[2].parse::<u32>().ok()?;
    let year = expand_year(caps[3].parse::<i32>().ok()?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn inline_date(caps: &Captures, order: FieldOrder) -> Option<NaiveDate> {
    match order {
        FieldOrder::MonthNameDayYear => {
            let month = parse_month(&caps[1])?;
            let day = caps[2].parse::<u32>().ok()?;
            let year = caps[3].parse::<i32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
        FieldOrder::DayMonthYear => {
            let day = caps[1].parse::<u32>().ok()?;
            let month = caps[2].parse::<u32>().ok()?;
            let year = expand_year(caps[3].parse::<i32>().ok()?);
            NaiveDate::from_ymd_opt(year, month, day)
        }
        FieldOrder::YearMonthDay => {
            let year = caps[1].parse::<i32>().ok()?;
            let month = caps[2].parse::<u32>().ok()?;
            let day = caps[3].parse::<u32>().ok()?;
            NaiveDate::from_ymd_opt(year, month, day)
        }
    }
}

fn mask_span(line: &str, span: Range<usize>) -> String {
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..span.start]);
    out.push_str(&" ".repeat(span.len()));
    out.push_str(&line[span.end..]);
    out
}

fn expand_year(y: i32) -> i32 {
    if y < 100 { 2000 + y } else { y }
}

/// The line minus brackets and anything before the first ` - ` separator.
fn event_text(line: &str) -> String {
    let unbracketed = line.replace(['[', ']'], "");
    match unbracketed.split_once(" - ") {
        Some((_, rest)) => rest.to_string(),
        None => unbracketed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_event_text_strips_prefix_and_brackets() {
        assert_eq!(
            event_text("[11/15/25, 2:30 PM] - John: launch on 2025-12-01"),
            "John: launch on 2025-12-01"
        );
        assert_eq!(event_text("[note] 2025-12-01"), "note 2025-12-01");
    }

    #[test]
    fn test_timestamp_only_line_is_placeholder() {
        let map = scan_dates(
            "[11/16/25, 9:00 AM] Ann: morning all",
            d(2025, 11, 15),
            ScanLimits::default(),
        );
        let entry = map.get_date(d(2025, 11, 16)).unwrap();
        assert!(entry.is_placeholder());
    }

    #[test]
    fn test_inline_mention_replaces_placeholder_description() {
        let text = "[11/20/25, 9:00 AM] Ann: hi\n[11/19/25, 9:00 AM] Bob: demo on 2025-11-20";
        let map = scan_dates(text, d(2025, 11, 15), ScanLimits::default());
        let entry = map.get_date(d(2025, 11, 20)).unwrap();
        assert_eq!(entry.description, "11/19/25, 9:00 AM Bob: demo on 2025-11-20");
        assert_eq!(entry.events.len(), 1);
    }

    #[test]
    fn test_event_text_is_truncated() {
        let long = format!("2030-01-02 {}", "x".repeat(200));
        let map = scan_dates(&long, d(2025, 1, 1), ScanLimits::default());
        let entry = map.get_date(d(2030, 1, 2)).unwrap();
        assert_eq!(entry.description.chars().count(), 100);
        assert_eq!(entry.events[0].chars().count(), 80);
    }
}
