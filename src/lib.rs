//! Create reminders from Japanese natural-language deadlines.
//!
//! The library holds everything below the form: deadline resolution, the
//! reminders store contract and its backends, the submission state machine,
//! the outcome-to-message mapping, and persisted settings.

pub mod config;
pub mod deadline;
pub mod feedback;
pub mod logging;
pub mod reminders;
pub mod submission;

pub use config::Settings;
pub use deadline::{DeadlineResolver, ParseError};
pub use reminders::{
    AccessState, MemoryService, ReminderList, ReminderRequest, ReminderService, ReminderStore,
    StoreError,
};
pub use submission::{FailureKind, SubmissionController, SubmissionOutcome};
