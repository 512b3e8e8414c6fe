// File: ./src/model/item.rs
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Author recorded for transcript lines that carry no `author:` split.
pub const SYSTEM_AUTHOR: &str = "System";

/// Description stored for dates that were only seen as message timestamps.
pub const TIMESTAMP_PLACEHOLDER: &str = "Message timestamp";

// --- TRANSCRIPT ---

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp_text: String,
    pub author: String,
    pub body: String,
}

impl Message {
    pub fn is_system(&self) -> bool {
        self.author == SYSTEM_AUTHOR
    }
}

// --- DATE KEYS ---

/// Key of an accumulated date entry.
///
/// Unscheduled entries carry an ordinal that is unique within one `DateMap`,
/// so two "TBD" events never land under the same key.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DateKey {
    Scheduled(NaiveDate),
    Unscheduled(u32),
}

impl DateKey {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, DateKey::Scheduled(_))
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateKey::Scheduled(d) => Some(*d),
            DateKey::Unscheduled(_) => None,
        }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Scheduled(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DateKey::Unscheduled(n) => write!(f, "TBD_{}", n),
        }
    }
}

impl FromStr for DateKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(n) = s.strip_prefix("TBD_") {
            return n
                .parse::<u32>()
                .map(DateKey::Unscheduled)
                .map_err(|e| format!("Invalid TBD ordinal '{}': {}", s, e));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateKey::Scheduled)
            .map_err(|e| format!("Invalid date key '{}': {}", s, e))
    }
}

// Keys serialize as plain strings so a DateMap stays a JSON object.
impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// Scheduled dates sort chronologically; unscheduled ones after them by ordinal.
impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DateKey::Scheduled(a), DateKey::Scheduled(b)) => a.cmp(b),
            (DateKey::Scheduled(_), DateKey::Unscheduled(_)) => Ordering::Less,
            (DateKey::Unscheduled(_), DateKey::Scheduled(_)) => Ordering::Greater,
            (DateKey::Unscheduled(a), DateKey::Unscheduled(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DateSource {
    Regex,
    Model,
    Both,
}

impl DateSource {
    pub fn combine(self, other: DateSource) -> DateSource {
        if self == other { self } else { DateSource::Both }
    }
}

/// A single date mention before accumulation.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateCandidate {
    pub key: DateKey,
    pub source: DateSource,
    pub raw_event_text: String,
    pub provenance_line: Option<String>,
}

/// Accumulated state for one date key.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateEntry {
    pub events: Vec<String>,
    pub description: String,
    pub source: DateSource,
}

impl DateEntry {
    pub fn new(description: impl Into<String>, source: DateSource) -> Self {
        Self {
            events: Vec::new(),
            description: description.into(),
            source,
        }
    }

    /// Appends an event text unless the exact same string is already present.
    pub fn push_event(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.events.contains(&text) {
            return false;
        }
        self.events.push(text);
        true
    }

    /// True for entries that only ever saw a message timestamp.
    pub fn is_placeholder(&self) -> bool {
        self.events.is_empty() && self.description == TIMESTAMP_PLACEHOLDER
    }
}

/// Date-keyed accumulation owned by a single extraction call.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DateMap {
    pub entries: BTreeMap<DateKey, DateEntry>,
    next_ordinal: u32,
}

impl DateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &DateKey) -> Option<&DateEntry> {
        self.entries.get(key)
    }

    pub fn get_date(&self, date: NaiveDate) -> Option<&DateEntry> {
        self.entries.get(&DateKey::Scheduled(date))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &DateEntry)> {
        self.entries.iter()
    }

    /// Drops scheduled entries dated before `today`. Unscheduled entries stay.
    pub fn drop_before(&mut self, today: NaiveDate) {
        self.entries
            .retain(|key, _| key.date().is_none_or(|date| date >= today));
    }

    /// Reserves a fresh key for an event that has no resolvable date.
    pub fn next_unscheduled_key(&mut self) -> DateKey {
        let key = DateKey::Unscheduled(self.next_ordinal);
        self.next_ordinal += 1;
        key
    }

    /// Stores an unscheduled event under a brand new key.
    pub fn insert_unscheduled(&mut self, event: &str, source: DateSource) -> DateKey {
        let key = self.next_unscheduled_key();
        let mut entry = DateEntry::new(event, source);
        entry.push_event(event);
        self.entries.insert(key, entry);
        key
    }

    pub fn entry_mut(&mut self, date: NaiveDate) -> Option<&mut DateEntry> {
        self.entries.get_mut(&DateKey::Scheduled(date))
    }

    pub(crate) fn insert(&mut self, key: DateKey, entry: DateEntry) {
        if let DateKey::Unscheduled(n) = key
            && n >= self.next_ordinal
        {
            self.next_ordinal = n + 1;
        }
        self.entries.insert(key, entry);
    }
}

// --- TODOS ---

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TodoEntry {
    pub task: String,
    pub priority: Priority,
}

// --- CALENDAR ---

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date_key: DateKey,
    pub title: String,
    pub description: String,
    pub events: Vec<String>,
    pub is_scheduled: bool,
}

impl CalendarEntry {
    /// ISO date for scheduled entries, `TBD` otherwise.
    pub fn date_label(&self) -> String {
        match self.date_key {
            DateKey::Scheduled(d) => d.format("%Y-%m-%d").to_string(),
            DateKey::Unscheduled(_) => "TBD".to_string(),
        }
    }
}

// --- CONVERSATION ---

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

// --- RESULT ---

/// Output of one extraction call.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub todos: Vec<TodoEntry>,
    pub calendar: Vec<CalendarEntry>,
    /// Merged date map the calendar was built from, kept for cross-document reconciliation.
    pub dates: DateMap,
}

/// Truncates to at most `max` characters, never splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
