// File: ./src/store.rs
// In-memory registry of processed documents, in upload order.
use crate::model::item::{CalendarEntry, DateMap, Extraction, TodoEntry};
use crate::model::merge::{CalendarOptions, finalize};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub name: String,
    pub content: String,
    pub uploaded_at: DateTime<Utc>,
    pub message_count: usize,
    pub extraction: Extraction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub message_count: usize,
    pub todo_count: usize,
    pub date_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub files: Vec<String>,
    pub total_lines: usize,
    pub total_todos: usize,
    pub total_calendar_entries: usize,
    pub is_ready: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Vec<StoredDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Inserts or replaces by name. A replaced document keeps its position.
    pub fn upsert(&mut self, doc: StoredDocument) {
        match self.docs.iter_mut().find(|d| d.name == doc.name) {
            Some(existing) => {
                log::debug!("Replacing results for '{}'", doc.name);
                *existing = doc;
            }
            None => self.docs.push(doc),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<StoredDocument> {
        let idx = self.docs.iter().position(|d| d.name == name)?;
        Some(self.docs.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&StoredDocument> {
        self.docs.iter().find(|d| d.name == name)
    }

    pub fn list(&self) -> Vec<DocumentSummary> {
        self.docs
            .iter()
            .map(|d| DocumentSummary {
                name: d.name.clone(),
                uploaded_at: d.uploaded_at,
                message_count: d.message_count,
                todo_count: d.extraction.todos.len(),
                date_count: d.extraction.calendar.len(),
            })
            .collect()
    }

    /// Every document's text under a `--- File: <name> ---` banner, blank-line separated.
    pub fn combined_content(&self) -> String {
        self.docs
            .iter()
            .flat_map(|d| [format!("--- File: {} ---", d.name), d.content.clone()])
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn all_todos(&self) -> Vec<TodoEntry> {
        self.docs
            .iter()
            .flat_map(|d| d.extraction.todos.iter().cloned())
            .collect()
    }

    /// Runs every document's date map through the merge engine in upload order,
    /// so one date mentioned by several uploads yields a single entry.
    /// Documents processed on earlier days may hold dates that are now past;
    /// those are dropped relative to `today`.
    pub fn reconciled_calendar(&self, today: NaiveDate, opts: CalendarOptions) -> Vec<CalendarEntry> {
        let mut merged = DateMap::new();
        for doc in &self.docs {
            merged.absorb(doc.extraction.dates.clone());
        }
        merged.drop_before(today);
        finalize(&merged, opts)
    }

    pub fn status(&self) -> StoreStatus {
        let combined = self.combined_content();
        StoreStatus {
            files: self.docs.iter().map(|d| d.name.clone()).collect(),
            total_lines: if combined.is_empty() {
                0
            } else {
                combined.split('\n').count()
            },
            total_todos: self.docs.iter().map(|d| d.extraction.todos.len()).sum(),
            total_calendar_entries: self.docs.iter().map(|d| d.extraction.calendar.len()).sum(),
            is_ready: !self.docs.is_empty(),
        }
    }
}
