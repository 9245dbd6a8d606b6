use std::collections::HashMap;

/// Zero-padding width of rendered sequence numbers.
pub const SEQUENCE_WIDTH: usize = 4;

/// Largest sequence number that fits [`SEQUENCE_WIDTH`].
pub const MAX_PADDED_SEQUENCE: u32 = 9999;

/// Per-date counters for a single run.
#[derive(Debug, Clone, Default)]
pub struct SequenceAllocator {
    counters: HashMap<String, u32>,
}

impl SequenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next 1-based number for `date_key`.
    pub fn next(&mut self, date_key: &str) -> u32 {
        if let Some(counter) = self.counters.get_mut(date_key) {
            *counter += 1;
            return *counter;
        }
        self.counters.insert(date_key.to_string(), 1);
        1
    }

    /// Numbers handed out so far for `date_key`.
    pub fn assigned(&self, date_key: &str) -> u32 {
        self.counters.get(date_key).copied().unwrap_or(0)
    }
}

/// Renders `n` zero-padded; numbers past the padded width keep all their digits.
pub fn format_sequence(n: u32) -> String {
    format!("{:0width$}", n, width = SEQUENCE_WIDTH)
}
