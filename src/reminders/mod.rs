pub mod access;
pub mod error;
#[cfg(target_os = "macos")]
pub mod eventkit;
pub mod list;
pub mod memory;
pub mod reminder;
pub mod service;
pub mod store;

pub use access::AccessState;
pub use error::StoreError;
#[cfg(target_os = "macos")]
pub use eventkit::EventKitService;
pub use list::ReminderList;
pub use memory::MemoryService;
pub use reminder::{ReminderRecord, ReminderRequest, ResolvedDeadline};
pub use service::ReminderService;
pub use store::ReminderStore;
