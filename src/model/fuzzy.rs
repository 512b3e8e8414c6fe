// File: ./src/model/fuzzy.rs
//! Permissive date parsing used when a model emits something other than `YYYY-MM-DD`.
//!
//! Missing fields are filled from the reference date, so "Nov 20" resolves in the
//! reference year and "friday" resolves to the next Friday after it.
use chrono::{Datelike, Duration, NaiveDate, Weekday};

const NUMERIC_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%m/%d/%Y", "%m-%d-%Y", "%d.%m.%Y",
];

pub fn parse_fuzzy_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let cleaned = clean(input);
    if cleaned.is_empty() {
        return None;
    }

    for fmt in NUMERIC_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&cleaned, fmt) {
            return Some(d);
        }
    }

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    parse_relative(&words, today)
        .or_else(|| parse_month_name(&words, today))
        .or_else(|| parse_short_numeric(&cleaned, today))
}

fn clean(input: &str) -> String {
    input
        .trim()
        .trim_matches(|c: char| c == '[' || c == ']' || c == '"' || c == '\'' || c == '.')
        .replace(',', " ")
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !matches!(*w, "on" | "the" | "of" | "by" | "at"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_relative(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    match words {
        ["today"] | ["tonight"] => Some(today),
        ["tomorrow"] => add_days(today, 1),
        ["day", "after", "tomorrow"] => add_days(today, 2),
        ["next", unit] => parse_next(unit, today),
        ["this", day] => {
            let target = parse_weekday(day)?;
            if today.weekday() == target {
                Some(today)
            } else {
                next_weekday(today, target)
            }
        }
        ["in", amount, unit] | [amount, unit, "from", "now"] => {
            parse_in(parse_english_number(amount)?, unit, today)
        }
        [day] => next_weekday(today, parse_weekday(day)?),
        _ => None,
    }
}

fn parse_next(unit: &str, today: NaiveDate) -> Option<NaiveDate> {
    match unit {
        "week" => add_days(today, 7),
        "month" => add_days(today, 30),
        "year" => add_days(today, 365),
        _ => next_weekday(today, parse_weekday(unit)?),
    }
}

fn parse_in(amount: u32, unit: &str, today: NaiveDate) -> Option<NaiveDate> {
    let days = match unit {
        "d" | "day" | "days" => amount as i64,
        "w" | "week" | "weeks" => amount as i64 * 7,
        "mo" | "month" | "months" => amount as i64 * 30,
        "y" | "year" | "years" => amount as i64 * 365,
        _ => return None,
    };
    add_days(today, days)
}

/// `None` when the offset leaves chrono's representable range.
fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// "november 20 2025", "20 nov 2025", "dec 5th", "5th of december".
fn parse_month_name(words: &[&str], today: NaiveDate) -> Option<NaiveDate> {
    let month_idx = words.iter().position(|w| parse_month(w).is_some())?;
    let month = parse_month(words[month_idx])?;

    let mut day = None;
    let mut year = None;
    for (i, w) in words.iter().enumerate() {
        if i == month_idx {
            continue;
        }
        let Some(n) = parse_ordinal(w) else {
            continue;
        };
        if w.len() == 4 && n >= 1000 {
            year = Some(n as i32);
        } else if day.is_none() && (1..=31).contains(&n) {
            day = Some(n);
        }
    }

    NaiveDate::from_ymd_opt(year.unwrap_or(today.year()), month, day?)
}

/// "11/20" without a year, read month first.
fn parse_short_numeric(cleaned: &str, today: NaiveDate) -> Option<NaiveDate> {
    let (m, d) = cleaned.split_once('/')?;
    let month = m.parse::<u32>().ok()?;
    let day = d.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

fn parse_ordinal(s: &str) -> Option<u32> {
    let digits = s
        .strip_suffix("st")
        .or_else(|| s.strip_suffix("nd"))
        .or_else(|| s.strip_suffix("rd"))
        .or_else(|| s.strip_suffix("th"))
        .unwrap_or(s);
    digits.parse::<u32>().ok()
}

pub(crate) fn parse_month(s: &str) -> Option<u32> {
    let m = match s.to_lowercase().trim_end_matches('.') {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(m)
}

fn parse_weekday(s: &str) -> Option<Weekday> {
    match s.to_lowercase().as_str() {
        "mo" | "mon" | "monday" => Some(Weekday::Mon),
        "tu" | "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "we" | "wed" | "wednesday" => Some(Weekday::Wed),
        "th" | "thu" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fr" | "fri" | "friday" => Some(Weekday::Fri),
        "sa" | "sat" | "saturday" => Some(Weekday::Sat),
        "su" | "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn parse_english_number(s: &str) -> Option<u32> {
    match s {
        "a" | "an" | "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        "six" => Some(6),
        "seven" => Some(7),
        "eight" => Some(8),
        "nine" => Some(9),
        "ten" => Some(10),
        "eleven" => Some(11),
        "twelve" => Some(12),
        _ => s.parse::<u32>().ok(),
    }
}

fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let mut d = from.succ_opt()?;
    while d.weekday() != target {
        d = d.succ_opt()?;
    }
    Some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_name_forms() {
        let today = d(2025, 11, 15);
        assert_eq!(parse_fuzzy_date("November 20, 2025", today), Some(d(2025, 11, 20)));
        assert_eq!(parse_fuzzy_date("20 Nov 2025", today), Some(d(2025, 11, 20)));
        assert_eq!(parse_fuzzy_date("Dec 5th", today), Some(d(2025, 12, 5)));
        assert_eq!(parse_fuzzy_date("5th of December", today), Some(d(2025, 12, 5)));
    }

    #[test]
    fn test_numeric_forms() {
        let today = d(2025, 11, 15);
        assert_eq!(parse_fuzzy_date("2025/11/20", today), Some(d(2025, 11, 20)));
        assert_eq!(parse_fuzzy_date("11/20/2025", today), Some(d(2025, 11, 20)));
        assert_eq!(parse_fuzzy_date("11/20", today), Some(d(2025, 11, 20)));
        assert_eq!(parse_fuzzy_date("[2025-11-20]", today), Some(d(2025, 11, 20)));
    }

    #[test]
    fn test_relative_forms() {
        // 2025-11-15 is a Saturday
        let today = d(2025, 11, 15);
        assert_eq!(parse_fuzzy_date("tomorrow", today), Some(d(2025, 11, 16)));
        assert_eq!(parse_fuzzy_date("next Monday", today), Some(d(2025, 11, 17)));
        assert_eq!(parse_fuzzy_date("friday", today), Some(d(2025, 11, 21)));
        assert_eq!(parse_fuzzy_date("in two weeks", today), Some(d(2025, 11, 29)));
        assert_eq!(parse_fuzzy_date("3 days from now", today), Some(d(2025, 11, 18)));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let today = d(2025, 11, 15);
        assert_eq!(parse_fuzzy_date("sometime soon", today), None);
        assert_eq!(parse_fuzzy_date("", today), None);
        assert_eq!(parse_fuzzy_date("in 1000000 years", today), None);
        assert_eq!(parse_fuzzy_date("4000000000 years from now", today), None);
        assert_eq!(parse_fuzzy_date("February 30, 2026", today), None);
    }
}
