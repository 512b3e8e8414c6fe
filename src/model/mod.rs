// File: ./src/model/mod.rs
pub mod fuzzy;
pub mod item;
pub mod merge;
pub mod recognizer;
pub mod transcript;

pub use item::{
    CalendarEntry, ConversationTurn, DateCandidate, DateEntry, DateKey, DateMap, DateSource,
    Extraction, Message, Priority, Role, TodoEntry,
};
pub use merge::{CalendarOptions, finalize, reconcile};
pub use recognizer::{ScanLimits, scan_dates};
pub use transcript::{Transcript, parse_transcript, render_transcript};
