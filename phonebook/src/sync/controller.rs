use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use phonebook_core::{ContactFields, DirectoryClient, DirectoryError, Record, RecordId};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::confirmation::{Decision, PendingConfirmation};
use super::notification::NotificationKind;
use super::state::{ControllerState, ViewState};

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
    #[error("name must not be empty")]
    EmptyName,
    #[error("no confirmation is pending")]
    NoPendingConfirmation,
    #[error("record {0} is not in the local snapshot")]
    UnknownRecord(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created(Record),
    NeedsConfirmation(PendingConfirmation),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied(Record),
    /// The update call failed; the record is treated as deleted server-side.
    Gone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Declined,
    Updated(UpdateOutcome),
    Deleted(Record),
}

struct Shared {
    state: Mutex<ControllerState>,
    view_tx: watch::Sender<ViewState>,
}

impl Shared {
    fn update<R>(&self, f: impl FnOnce(&mut ControllerState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let result = f(&mut *state);
        let next = state.view();
        self.view_tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
        result
    }

    fn read<R>(&self, f: impl FnOnce(&ControllerState) -> R) -> R {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&*state)
    }
}

/// Owns the local view of the phonebook and reconciles it with the remote
/// collection.
///
/// Every mutation that reaches the server is followed by a full resync.
/// State is never locked across an `.await`, so intents may overlap; resync
/// tickets keep the snapshot from moving backwards when they do.
pub struct SyncController {
    client: DirectoryClient,
    shared: Arc<Shared>,
    notification_ttl: Duration,
}

impl SyncController {
    pub fn new(client: DirectoryClient, notification_ttl: Duration) -> Self {
        let (view_tx, _) = watch::channel(ViewState::default());
        Self {
            client,
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState::default()),
                view_tx,
            }),
            notification_ttl,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.view_tx.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.shared.read(ControllerState::view)
    }

    /// Loads the initial snapshot. Failure leaves it empty; `refresh` is the
    /// way back.
    pub async fn initialize(&self) {
        match self.resync().await {
            Ok(()) => info!(
                records = self.shared.read(|state| state.snapshot.records().len()),
                "phonebook loaded"
            ),
            Err(err) => warn!(error = %err, "initial load failed, starting empty"),
        }
    }

    pub async fn refresh(&self) -> Result<(), ControllerError> {
        Ok(self.resync().await?)
    }

    pub fn set_draft_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.shared.update(|state| state.draft.name = name);
    }

    pub fn set_draft_number(&self, number: impl Into<String>) {
        let number = number.into();
        self.shared.update(|state| state.draft.number = number);
    }

    pub fn set_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.shared.update(|state| state.filter = filter);
    }

    /// Creates the draft as a new record, or asks to overwrite the record
    /// that already carries its name.
    pub async fn submit_add(&self) -> Result<AddOutcome, ControllerError> {
        let draft = self.shared.read(|state| state.draft.clone());
        if draft.name.is_empty() {
            return Err(ControllerError::EmptyName);
        }

        let existing = self.shared.update(|state| -> Option<PendingConfirmation> {
            let target = state.snapshot.find_by_name(&draft.name)?.id.clone();
            let pending = PendingConfirmation::Overwrite {
                target,
                fields: draft.clone(),
            };
            state.pending = Some(pending.clone());
            Some(pending)
        });
        if let Some(pending) = existing {
            debug!(name = %draft.name, "name collision, awaiting confirmation");
            return Ok(AddOutcome::NeedsConfirmation(pending));
        }

        let record = match self.client.create(&draft.name, &draft.number).await {
            Ok(record) => record,
            Err(err) => {
                warn!(name = %draft.name, error = %err, "create failed");
                self.notify(
                    NotificationKind::Error,
                    format!("ERROR: {} could not be added.", draft.name),
                );
                return Err(err.into());
            }
        };
        info!(id = %record.id, name = %record.name, "record created");
        self.shared.update(|state| {
            state.snapshot.push(record.clone());
            state.clear_draft_if(&draft);
        });
        self.notify(NotificationKind::Info, format!("{} added", draft.name));
        self.resync_after_mutation().await;
        Ok(AddOutcome::Created(record))
    }

    /// Applies the draft to an existing record without asking first.
    pub async fn submit_update(&self, id: &RecordId) -> Result<UpdateOutcome, ControllerError> {
        let (draft, target) = self.shared.read(|state| {
            (
                state.draft.clone(),
                state.snapshot.find_by_id(id).map(|record| record.id.clone()),
            )
        });
        let target = target.ok_or_else(|| ControllerError::UnknownRecord(id.clone()))?;
        if draft.name.is_empty() {
            return Err(ControllerError::EmptyName);
        }
        Ok(self.apply_update(&target, &draft).await)
    }

    /// Sends an update and resyncs whatever the outcome. Any failure is
    /// reported as the record having been deleted server-side.
    pub async fn apply_update(&self, id: &RecordId, fields: &ContactFields) -> UpdateOutcome {
        match self.client.update(id, fields).await {
            Ok(record) => {
                info!(id = %id, name = %fields.name, "record updated");
                self.resync_after_mutation().await;
                self.shared.update(|state| state.clear_draft_if(fields));
                self.notify(NotificationKind::Info, format!("{} updated", fields.name));
                UpdateOutcome::Applied(record)
            }
            Err(err) => {
                warn!(
                    id = %id,
                    not_found = err.is_not_found(),
                    error = %err,
                    "update failed, treating record as deleted"
                );
                self.resync_after_mutation().await;
                self.notify(
                    NotificationKind::Error,
                    format!(
                        "ERROR: the information of {} has been deleted from the server.",
                        fields.name
                    ),
                );
                UpdateOutcome::Gone
            }
        }
    }

    /// Asks to delete a record from the current snapshot.
    pub fn submit_delete(&self, id: &RecordId) -> Result<PendingConfirmation, ControllerError> {
        self.shared.update(|state| -> Result<PendingConfirmation, ControllerError> {
            let record = state
                .snapshot
                .find_by_id(id)
                .cloned()
                .ok_or_else(|| ControllerError::UnknownRecord(id.clone()))?;
            let pending = PendingConfirmation::Delete { record };
            state.pending = Some(pending.clone());
            Ok(pending)
        })
    }

    pub async fn resolve_confirmation(
        &self,
        decision: Decision,
    ) -> Result<Resolution, ControllerError> {
        let pending = self
            .shared
            .update(|state| state.pending.take())
            .ok_or(ControllerError::NoPendingConfirmation)?;

        if decision == Decision::Decline {
            debug!(prompt = %pending.prompt(), "confirmation declined");
            return Ok(Resolution::Declined);
        }

        match pending {
            PendingConfirmation::Overwrite { target, fields } => Ok(Resolution::Updated(
                self.apply_update(&target, &fields).await,
            )),
            PendingConfirmation::Delete { record } => {
                self.remove(&record).await;
                Ok(Resolution::Deleted(record))
            }
        }
    }

    async fn remove(&self, record: &Record) {
        match self.client.remove(&record.id).await {
            Ok(()) => info!(id = %record.id, name = %record.name, "record removed"),
            Err(err) => debug!(
                id = %record.id,
                error = %err,
                "remove failed, relying on resync"
            ),
        }
        self.resync_after_mutation().await;
        self.notify(NotificationKind::Info, format!("{} removed", record.name));
    }

    async fn resync(&self) -> Result<(), DirectoryError> {
        let ticket = self.shared.update(|state| state.snapshot.begin_resync());
        let records = self.client.list_all().await?;
        let applied = self
            .shared
            .update(|state| state.snapshot.apply(ticket, records));
        if !applied {
            debug!(?ticket, "dropping stale resync response");
        }
        Ok(())
    }

    async fn resync_after_mutation(&self) {
        if let Err(err) = self.resync().await {
            warn!(error = %err, "resync failed, keeping previous snapshot");
        }
    }

    fn notify(&self, kind: NotificationKind, message: String) {
        let ttl = self.notification_ttl;
        let shared = Arc::downgrade(&self.shared);
        self.shared.update(|state| {
            let serial = state.notification.replace(kind, message);
            let expiry = tokio::spawn(async move {
                tokio::time::sleep(ttl).await;
                if let Some(shared) = shared.upgrade() {
                    shared.update(|state| state.notification.expire(serial));
                }
            });
            state.notification.arm(expiry.abort_handle());
        });
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
