pub mod confirmation;
pub mod controller;
pub mod notification;
pub mod snapshot;
pub mod state;

pub use confirmation::{Decision, PendingConfirmation};
pub use controller::{AddOutcome, ControllerError, Resolution, SyncController, UpdateOutcome};
pub use notification::{Notification, NotificationKind};
pub use state::ViewState;
