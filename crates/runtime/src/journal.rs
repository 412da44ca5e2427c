/// A recorded session event.
///
/// Kinds are short static tags (`"phase"`, `"status"`, ...); messages are
/// free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub seq: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Append-only log of what the session did, in order.
#[derive(Debug, Default)]
pub struct Journal {
    next_seq: u64,
    entries: Vec<Entry>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: &'static str, message: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            seq,
            kind,
            message: message.into(),
        });
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Messages of every entry with the given kind, oldest first.
    pub fn messages(&self, kind: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.message.as_str())
            .collect()
    }
}
