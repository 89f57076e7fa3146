use serde::{Deserialize, Serialize};

/// Monotonic generator for prefixed, zero-padded identifiers such as `P001`
/// or `APT012`. A value handed out is never produced again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequentialId {
    prefix: String,
    width: usize,
    next: u64,
}

impl SequentialId {
    pub const DEFAULT_WIDTH: usize = 3;

    pub fn new(prefix: &str) -> Self {
        Self::with_width(prefix, Self::DEFAULT_WIDTH)
    }

    pub fn with_width(prefix: &str, width: usize) -> Self {
        Self {
            prefix: prefix.to_string(),
            width,
            next: 1,
        }
    }

    /// Resumes a sequence so that the next id issued is `next`.
    pub fn resume(prefix: &str, next: u64) -> Self {
        Self {
            next: next.max(1),
            ..Self::new(prefix)
        }
    }

    pub fn next_id(&mut self) -> String {
        let id = self.format(self.next);
        self.next += 1;
        id
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn format(&self, value: u64) -> String {
        format!("{}{:0width$}", self.prefix, value, width = self.width)
    }

    /// Numeric part of an id carrying this sequence's prefix.
    pub fn parse(&self, id: &str) -> Option<u64> {
        let digits = id.strip_prefix(self.prefix.as_str())?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}
