use chrono::FixedOffset;
use tracing::{debug, info, warn};

use super::access::AccessState;
use super::error::{Result, StoreError};
use super::list::ReminderList;
use super::reminder::{ReminderRecord, ReminderRequest, ResolvedDeadline};
use super::service::ReminderService;

/// The reminders store as the rest of the app sees it.
///
/// Lists are re-read from the service on every call; other apps may add,
/// remove or re-default lists at any time.
pub struct ReminderStore<S> {
    service: S,
    zone: FixedOffset,
}

impl<S: ReminderService> ReminderStore<S> {
    /// `zone` is the fixed zone due dates are recorded in.
    pub fn new(service: S, zone: FixedOffset) -> Self {
        Self { service, zone }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn zone(&self) -> FixedOffset {
        self.zone
    }

    pub fn access_state(&self) -> AccessState {
        self.service.access_state()
    }

    /// Safe to call repeatedly; once decided the state is returned as is.
    pub async fn request_access(&self) -> Result<AccessState> {
        let current = self.service.access_state();
        if current.is_decided() {
            debug!(state = ?current, "access already decided");
            return Ok(current);
        }
        let state = self.service.request_access().await?;
        info!(backend = self.service.name(), state = ?state, "reminders access requested");
        Ok(state)
    }

    pub fn list_all(&self) -> Result<Vec<ReminderList>> {
        self.require_full_access()?;
        Ok(self.service.lists())
    }

    pub fn default_list(&self) -> Result<ReminderList> {
        self.require_full_access()?;
        self.service.default_list().ok_or(StoreError::NoDefaultList)
    }

    /// Save one reminder with a due date and a single alarm at `deadline`.
    pub async fn create(
        &self,
        request: &ReminderRequest,
        deadline: ResolvedDeadline,
    ) -> Result<ReminderRecord> {
        self.require_full_access()?;
        let list = self.destination(request.destination())?;

        let due = deadline.with_timezone(&self.zone);
        let record = ReminderRecord {
            list_id: list.id.clone(),
            title: request.title.clone(),
            notes: request.notes().map(str::to_string),
            due,
            alarm: due,
        };

        if let Err(e) = self.service.save(&record).await {
            warn!(list = %list.id, error = %e, "saving reminder failed");
            return Err(match e {
                StoreError::CreateFailed(_) => e,
                other => StoreError::CreateFailed(other.to_string()),
            });
        }

        info!(
            list = %list.display_name,
            title = %record.title,
            due = %record.due,
            "reminder created"
        );
        Ok(record)
    }

    fn destination(&self, id: Option<&str>) -> Result<ReminderList> {
        let Some(id) = id else {
            return self.service.default_list().ok_or(StoreError::NoDefaultList);
        };

        let mut matches = self.service.lists().into_iter().filter(|list| list.id == id);
        match (matches.next(), matches.next()) {
            (Some(list), None) => Ok(list),
            (None, _) => Err(StoreError::ListNotFound(id.to_string())),
            (Some(_), Some(_)) => Err(StoreError::DuplicateListId(id.to_string())),
        }
    }

    fn require_full_access(&self) -> Result<()> {
        if self.service.access_state().is_full() {
            Ok(())
        } else {
            Err(StoreError::AccessDenied)
        }
    }
}
