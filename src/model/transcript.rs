// File: ./src/model/transcript.rs
//! Chat export parsing.
//!
//! A transcript is a sequence of lines shaped like `<datetime> - <author>: <text>`
//! or `<datetime> - <text>` (system notices). Any other non-blank line continues
//! the message that is currently open.
use crate::model::item::{Message, SYSTEM_AUTHOR};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Lines;

static AUTHORED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<datetime>[\d/\-.,\s:APMpm]+?)\s*-\s*(?P<author>[^:]+?):\s*(?P<text>.*)$")
        .expect("authored line pattern")
});

static SYSTEM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<datetime>[\d/\-.,\s:APMpm]+?)\s*-\s*(?P<text>[^:]+)$")
        .expect("system line pattern")
});

/// Borrowed view over a transcript; `messages()` can be called any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Transcript<'a> {
    text: &'a str,
}

impl<'a> Transcript<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    pub fn messages(&self) -> MessageIter<'a> {
        MessageIter {
            lines: self.text.lines(),
            current: None,
        }
    }
}

/// Lazily yields messages; a message is emitted once the next header line
/// (or the end of input) closes it.
pub struct MessageIter<'a> {
    lines: Lines<'a>,
    current: Option<Message>,
}

impl Iterator for MessageIter<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        for line in self.lines.by_ref() {
            if let Some(opened) = parse_header(line) {
                if let Some(done) = self.current.replace(opened) {
                    return Some(done);
                }
                continue;
            }

            if let Some(open) = self.current.as_mut()
                && !line.trim().is_empty()
            {
                open.body.push('\n');
                open.body.push_str(line);
            }
        }
        self.current.take()
    }
}

fn parse_header(line: &str) -> Option<Message> {
    if let Some(caps) = AUTHORED_LINE.captures(line) {
        return Some(Message {
            timestamp_text: caps["datetime"].to_string(),
            author: caps["author"].to_string(),
            body: caps["text"].to_string(),
        });
    }
    if let Some(caps) = SYSTEM_LINE.captures(line) {
        return Some(Message {
            timestamp_text: caps["datetime"].to_string(),
            author: SYSTEM_AUTHOR.to_string(),
            body: caps["text"].to_string(),
        });
    }
    None
}

pub fn parse_transcript(text: &str) -> Vec<Message> {
    let messages: Vec<Message> = Transcript::new(text).messages().collect();
    log::debug!("Parsed {} messages from transcript", messages.len());
    messages
}

/// Inverse of `parse_transcript` for well-formed input.
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| {
            if m.is_system() {
                format!("{} - {}", m.timestamp_text, m.body)
            } else {
                format!("{} - {}: {}", m.timestamp_text, m.author, m.body)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of lines that look like message headers (contain the ` - ` separator).
pub fn count_messages(text: &str) -> usize {
    text.trim().lines().filter(|l| l.contains(" - ")).count()
}
