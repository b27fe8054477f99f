use phonebook_core::{ContactFields, Record, RecordId};

/// A question waiting for the user before an intent may continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    /// The draft name collides with an existing record. `fields` is the draft
    /// as it was when the collision was found, so the prompt the user answers
    /// and the update that follows always carry the same name and number.
    Overwrite {
        target: RecordId,
        fields: ContactFields,
    },
    Delete {
        record: Record,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Decline,
}

impl PendingConfirmation {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirmation::Overwrite { fields, .. } => {
                format!("Name {} already exists. Update number?", fields.name)
            }
            PendingConfirmation::Delete { record } => {
                format!("Confirm deletion of: {}", record.name)
            }
        }
    }
}
