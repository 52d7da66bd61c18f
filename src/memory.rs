//! Session history of answered questions.

use chrono::{DateTime, Utc};

/// Default number of recent entries passed to the interpreter as context.
pub const DEFAULT_HISTORY_WINDOW: usize = 5;

/// One answered question.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Utc>,
}

/// Append-only log of question/answer pairs for the current process.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.entries.push(HistoryEntry {
            question: question.into(),
            answer: answer.into(),
            asked_at: Utc::now(),
        });
    }

    /// The last `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        &self.entries[self.entries.len().saturating_sub(n)..]
    }

    /// Every entry, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the last `n` entries as `Q:`/`A:` pairs, or `None` when there
    /// is nothing to show.
    pub fn format_context(&self, n: usize) -> Option<String> {
        let recent = self.recent(n);
        if recent.is_empty() {
            return None;
        }

        Some(
            recent
                .iter()
                .map(|entry| format!("Q: {}\nA: {}", entry.question, entry.answer))
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}
