// File: ./src/model/merge.rs
use crate::model::item::{CalendarEntry, DateKey, DateMap, truncate_chars};

/// Options controlling how a merged map is turned into calendar entries.
#[derive(Debug, Clone, Copy)]
pub struct CalendarOptions {
    pub title_limit: usize,
    /// Keep dates that were only ever seen as a message timestamp.
    pub include_placeholders: bool,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            title_limit: 150,
            include_placeholders: false,
        }
    }
}

impl DateMap {
    /// Merges `other` into `self`.
    ///
    /// Entries sharing a scheduled date union their event lists (exact string
    /// dedup) and take `other`'s description. Unscheduled entries are never
    /// matched against anything: each gets a fresh ordinal in `self`.
    pub fn absorb(&mut self, other: DateMap) {
        for (key, incoming) in other.entries {
            match key {
                DateKey::Unscheduled(_) => {
                    let fresh = self.next_unscheduled_key();
                    self.insert(fresh, incoming);
                }
                DateKey::Scheduled(date) => match self.entry_mut(date) {
                    Some(existing) => {
                        for event in incoming.events {
                            existing.push_event(event);
                        }
                        existing.description = incoming.description;
                        existing.source = existing.source.combine(incoming.source);
                    }
                    None => self.insert(key, incoming),
                },
            }
        }
    }
}

/// Combines regex-sourced and model-sourced dates; the model side is merged last.
pub fn reconcile(regex: DateMap, model: DateMap) -> DateMap {
    let mut merged = DateMap::new();
    merged.absorb(regex);
    merged.absorb(model);
    merged
}

/// Builds the sorted calendar list for a merged map.
pub fn finalize(map: &DateMap, opts: CalendarOptions) -> Vec<CalendarEntry> {
    map.iter()
        .filter(|(_, entry)| opts.include_placeholders || !entry.is_placeholder())
        .map(|(key, entry)| {
            let joined = entry.events.join(" | ");
            let title = if joined.is_empty() {
                entry.description.clone()
            } else {
                truncate_chars(&joined, opts.title_limit)
            };
            CalendarEntry {
                date_key: *key,
                title,
                description: entry.description.clone(),
                events: entry.events.clone(),
                is_scheduled: key.is_scheduled(),
            }
        })
        .collect()
}
