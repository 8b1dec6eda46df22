//! Poll schedule state: the one-shot initial message set and the
//! perpetual auto-update table.

use otgw_protocol::DataId;

/// Identifiers queried once at startup, in insertion order.
///
/// Deduplicated on insertion and consumed through a forward-only cursor:
/// the sweep never revisits an identifier.
#[derive(Debug, Clone, Default)]
pub struct InitialMessages {
    ids: Vec<DataId>,
    cursor: usize,
}

impl InitialMessages {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier; duplicates are ignored.
    pub fn add(&mut self, id: DataId) {
        if !self.ids.contains(&id) {
            log::debug!("adding initial message {}", id);
            self.ids.push(id);
        }
    }

    /// Take the next identifier, or `None` once the sweep is done.
    pub fn next(&mut self) -> Option<DataId> {
        let id = self.ids.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(id)
    }

    /// Whether the cursor has passed the last identifier.
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.ids.len()
    }

    /// Number of identifiers in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// One auto-update entry.
#[derive(Debug, Clone, Copy)]
pub struct AutoUpdateEntry {
    /// The identifier to poll.
    pub data_id: DataId,
    /// Minimum refresh interval.
    pub interval_ms: u32,
    /// Time since this identifier was last refreshed, by any path.
    pub elapsed_ms: u32,
}

impl AutoUpdateEntry {
    /// Whether the entry has reached its refresh interval.
    pub fn is_due(&self) -> bool {
        self.elapsed_ms >= self.interval_ms
    }
}

/// Identifiers refreshed periodically, with a wrapping round-robin cursor.
///
/// Entries keep insertion order so the scan order is deterministic.
/// Elapsed time advances for every entry on every tick; it resets to zero
/// whenever a successful exchange for that identifier is observed, whether
/// the scheduler initiated it or it appeared in thermostat traffic.
#[derive(Debug, Clone, Default)]
pub struct AutoUpdateTable {
    entries: Vec<AutoUpdateEntry>,
    cursor: usize,
}

impl AutoUpdateTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier with a refresh interval in seconds.
    ///
    /// Adding an identifier twice keeps the shorter non-zero interval.
    /// Elapsed time resets to zero on every insertion.
    pub fn add(&mut self, id: DataId, interval_secs: u32) {
        let interval_ms = interval_secs.saturating_mul(1000);
        log::debug!("adding auto-update message {} every {} sec", id, interval_secs);
        if let Some(entry) = self.entries.iter_mut().find(|e| e.data_id == id) {
            entry.elapsed_ms = 0;
            if interval_ms != 0 && (entry.interval_ms == 0 || entry.interval_ms > interval_ms) {
                entry.interval_ms = interval_ms;
            }
            return;
        }
        self.entries.push(AutoUpdateEntry {
            data_id: id,
            interval_ms,
            elapsed_ms: 0,
        });
    }

    /// Age every entry by the elapsed tick time.
    pub fn advance(&mut self, delta_ms: u32) {
        for entry in &mut self.entries {
            entry.elapsed_ms = entry.elapsed_ms.saturating_add(delta_ms);
        }
    }

    /// Reset the elapsed time of one identifier after a successful
    /// exchange. Returns whether the identifier was in the table.
    pub fn mark_updated(&mut self, id: DataId) -> bool {
        match self.entries.iter_mut().find(|e| e.data_id == id) {
            Some(entry) => {
                entry.elapsed_ms = 0;
                true
            }
            None => false,
        }
    }

    /// Examine the entry under the round-robin cursor and advance the
    /// cursor by exactly one position, wrapping at the end.
    ///
    /// Returns the identifier when the examined entry was due for a
    /// refresh. One call per tick gives every entry exactly one visit per
    /// full sweep.
    pub fn step_cursor(&mut self) -> Option<DataId> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor >= self.entries.len() {
            self.cursor = 0;
        }
        let entry = self.entries[self.cursor];
        self.cursor = (self.cursor + 1) % self.entries.len();
        entry.is_due().then_some(entry.data_id)
    }

    /// Look up one entry.
    pub fn get(&self, id: DataId) -> Option<&AutoUpdateEntry> {
        self.entries.iter().find(|e| e.data_id == id)
    }

    /// All entries, in scan order.
    pub fn entries(&self) -> &[AutoUpdateEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
