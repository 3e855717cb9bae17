use async_trait::async_trait;

use super::access::AccessState;
use super::error::Result;
use super::list::ReminderList;
use super::reminder::ReminderRecord;

/// Primitives of a platform reminders service.
///
/// Implementations report what the platform says and nothing more; access
/// checks and destination resolution live in [`super::ReminderStore`].
#[async_trait(?Send)]
pub trait ReminderService {
    /// Human-readable backend name for logs and the status bar.
    fn name(&self) -> &str;

    fn access_state(&self) -> AccessState;

    /// Prompt for full access if the user has not decided yet.
    async fn request_access(&self) -> Result<AccessState>;

    fn lists(&self) -> Vec<ReminderList>;

    fn default_list(&self) -> Option<ReminderList>;

    async fn save(&self, record: &ReminderRecord) -> Result<()>;
}

#[async_trait(?Send)]
impl<S: ReminderService + ?Sized> ReminderService for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn access_state(&self) -> AccessState {
        (**self).access_state()
    }

    async fn request_access(&self) -> Result<AccessState> {
        (**self).request_access().await
    }

    fn lists(&self) -> Vec<ReminderList> {
        (**self).lists()
    }

    fn default_list(&self) -> Option<ReminderList> {
        (**self).default_list()
    }

    async fn save(&self, record: &ReminderRecord) -> Result<()> {
        (**self).save(record).await
    }
}
