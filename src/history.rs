// File: ./src/history.rs
// Rolling question/answer memory for the conversational path.
use crate::model::item::{ConversationTurn, Role};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_PAIRS: usize = 10;

#[derive(Debug, Clone)]
pub struct ConversationHistory {
    turns: VecDeque<ConversationTurn>,
    max_pairs: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_PAIRS)
    }
}

impl ConversationHistory {
    pub fn new(max_pairs: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(max_pairs * 2),
            max_pairs,
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity_turns(&self) -> usize {
        self.max_pairs * 2
    }

    /// Records one completed exchange, evicting the oldest pair when full.
    pub fn push_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        if self.max_pairs == 0 {
            return;
        }
        while self.turns.len() + 2 > self.capacity_turns() {
            self.turns.pop_front();
            self.turns.pop_front();
        }
        self.turns.push_back(ConversationTurn {
            role: Role::User,
            content: question.into(),
        });
        self.turns.push_back(ConversationTurn {
            role: Role::Assistant,
            content: answer.into(),
        });
    }

    /// Flat `User: ...` / `Assistant: ...` rendering, one turn per line.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| match t.role {
                Role::User => format!("User: {}", t.content),
                Role::Assistant => format!("Assistant: {}", t.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
