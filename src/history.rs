use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// History keeps only the most recent calculations.
pub const HISTORY_LIMIT: usize = 10;

/// Snapshot of one completed calculation. Entries are never edited after
/// recording; the collection is prepend-and-truncate only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub destination: String,
    pub arrival_time: NaiveTime,
    pub transport_label: String,
    pub departure_time: NaiveTime,
    pub wake_up_time: NaiveTime,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    next_id: i64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        destination: &str,
        arrival_time: NaiveTime,
        transport_label: &str,
        departure_time: NaiveTime,
        wake_up_time: NaiveTime,
        date: NaiveDate,
    ) -> &HistoryEntry {
        self.next_id += 1;
        let entry = HistoryEntry {
            id: self.next_id,
            destination: destination.to_string(),
            arrival_time,
            transport_label: transport_label.to_string(),
            departure_time,
            wake_up_time,
            date,
        };
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        &self.entries[0]
    }

    /// Newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn find(&self, id: i64) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
