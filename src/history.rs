//! Linear browsing history
//!
//! Visiting a destination while positioned before the tail discards the
//! forward entries first, so the history is always a single line rather
//! than a tree.

use serde::Serialize;

/// Ordered visited destinations and the current position
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
    entries: Vec<String>,
    /// `None` iff `entries` is empty
    position: Option<usize>,
}

/// Snapshot handed to the view after every history mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationState {
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub current: Option<String>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new destination, dropping any forward entries
    pub fn visit(&mut self, destination: impl Into<String>) {
        if let Some(position) = self.position {
            self.entries.truncate(position + 1);
        }
        self.entries.push(destination.into());
        self.position = Some(self.entries.len() - 1);
    }

    /// Step back one entry. `None` at the first entry or when empty.
    pub fn back(&mut self) -> Option<&str> {
        match self.position {
            Some(position) if position > 0 => {
                self.position = Some(position - 1);
                self.current()
            }
            _ => None,
        }
    }

    /// Step forward one entry. `None` at the tail or when empty.
    pub fn forward(&mut self) -> Option<&str> {
        match self.position {
            Some(position) if position + 1 < self.entries.len() => {
                self.position = Some(position + 1);
                self.current()
            }
            _ => None,
        }
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.position, Some(position) if position > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        matches!(self.position, Some(position) if position + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&str> {
        self.position
            .and_then(|position| self.entries.get(position))
            .map(String::as_str)
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self) -> NavigationState {
        NavigationState {
            can_go_back: self.can_go_back(),
            can_go_forward: self.can_go_forward(),
            current: self.current().map(str::to_string),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
