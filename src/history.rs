//! In-memory record of completed calculations. Entries live for the
//! process lifetime only; nothing is persisted.

use crate::lex::Token;

/// One fully evaluated expression.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub infix: String,
    pub postfix: String,
    pub result: f64,
}

impl HistoryEntry {
    pub fn new(infix: &str, postfix: &[Token<'_>], result: f64) -> Self {
        HistoryEntry {
            infix: infix.to_string(),
            postfix: render(postfix),
            result,
        }
    }
}

/// Append-only list of completed calculations.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Render a token sequence for display: tokens joined by single spaces,
/// numbers in the spelling they were typed with.
pub fn render(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
