use phonebook_core::{ContactFields, Record};

use super::confirmation::PendingConfirmation;
use super::notification::{Notification, NotificationSlot};
use super::snapshot::{Snapshot, filter_records};

/// Everything a renderer needs, published after every state change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub snapshot: Vec<Record>,
    pub visible: Vec<Record>,
    pub generation: u64,
    pub draft: ContactFields,
    pub filter: String,
    pub notification: Option<Notification>,
    pub pending_confirmation: Option<PendingConfirmation>,
}

#[derive(Debug, Default)]
pub(crate) struct ControllerState {
    pub snapshot: Snapshot,
    pub draft: ContactFields,
    pub filter: String,
    pub notification: NotificationSlot,
    pub pending: Option<PendingConfirmation>,
}

impl ControllerState {
    pub fn view(&self) -> ViewState {
        ViewState {
            snapshot: self.snapshot.records().to_vec(),
            visible: filter_records(self.snapshot.records(), &self.filter),
            generation: self.snapshot.generation(),
            draft: self.draft.clone(),
            filter: self.filter.clone(),
            notification: self.notification.current().cloned(),
            pending_confirmation: self.pending.clone(),
        }
    }

    /// Clears the draft unless it was edited while a submission was in flight.
    pub fn clear_draft_if(&mut self, submitted: &ContactFields) {
        if &self.draft == submitted {
            self.draft = ContactFields::default();
        }
    }
}
