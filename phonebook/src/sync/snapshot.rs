use phonebook_core::{Record, RecordId};

/// Ticket handed out before a resync request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResyncTicket(u64);

/// The controller's copy of the remote collection.
///
/// Resyncs replace the records wholesale. Each resync is issued a ticket
/// and a response is only applied when its ticket is newer than whatever
/// produced the current contents, so a slow list response cannot roll the
/// snapshot back over a newer one.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<Record>,
    issued: u64,
    applied: u64,
}

impl Snapshot {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Generation of the current contents.
    pub fn generation(&self) -> u64 {
        self.applied
    }

    pub fn begin_resync(&mut self) -> ResyncTicket {
        self.issued += 1;
        ResyncTicket(self.issued)
    }

    /// Replaces the records if `ticket` is newer than the current contents.
    pub fn apply(&mut self, ticket: ResyncTicket, records: Vec<Record>) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.records = records;
        self.applied = ticket.0;
        true
    }

    /// Appends a record returned by a create call. Resyncs issued before this
    /// point can no longer overwrite it.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
        self.applied = self.issued;
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn find_by_id(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id.addresses_same(id))
    }
}

/// Records whose name contains `filter`, ignoring case. An empty filter keeps
/// everything in snapshot order.
pub fn filter_records(records: &[Record], filter: &str) -> Vec<Record> {
    if filter.is_empty() {
        return records.to_vec();
    }
    let needle = filter.to_lowercase();
    records
        .iter()
        .filter(|record| record.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
